//! # Mini-App Console
//!
//! A terminal client for the club Mini-App: the customer app (profile,
//! course, payment, referrals) and the admin dashboard (KPIs, funnel, events,
//! CRM, broadcasts), both rendered over the Mini-App HTTP API.
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)
//!
//! Every request carries the host-provided `initData` as
//! `Authorization: tma <token>` and is bound to the cancellation token of the
//! screen that issued it.

pub mod app;
pub mod config;
pub mod constants;
pub mod identity;
pub mod messages;
pub mod models;
pub mod network;
pub mod query;
pub mod screens;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use config::AppConfig;
pub use identity::IdentityProvider;
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use network::{ApiClient, ApiError, NetworkActor};
