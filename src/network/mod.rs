//! Network layer - authenticated API client and request execution
//!
//! The Network actor receives fetch/mutation commands and sends back responses.

pub mod actor;
pub mod client;
pub mod endpoints;
pub mod error;

pub use actor::NetworkActor;
pub use client::{ApiClient, ApiPayload};
pub use error::ApiError;
