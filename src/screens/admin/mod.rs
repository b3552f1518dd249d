//! Admin dashboard screens

pub mod broadcast;
pub mod crm;
pub mod events;
pub mod funnel;
pub mod home;

pub use broadcast::BroadcastScreen;
pub use crm::CrmScreen;
