//! Customer app screens

pub mod course;
pub mod dashboard;
pub mod payment;
pub mod referral;

pub use course::CourseScreen;
pub use payment::PaymentScreen;
pub use referral::ReferralScreen;
