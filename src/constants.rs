//! Application constants
//!
//! Centralized location for endpoint paths, environment variable names and
//! timing defaults.

use std::time::Duration;

/// Application name
pub const APP_NAME: &str = "Mini-App Console";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory under the home dir holding `config.yaml`
pub const CONFIG_DIR_NAME: &str = ".miniapp-console";

/// Config file name inside [`CONFIG_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Log file written by the non-blocking appender
pub const LOG_FILE_NAME: &str = "miniapp.log";

// Environment variables
pub const ENV_API_URL: &str = "TMA_API_URL";
pub const ENV_INIT_DATA: &str = "TMA_INIT_DATA";
pub const ENV_HOST_CONTEXT: &str = "TMA_HOST_CONTEXT";
pub const ENV_HOST_CONTEXT_FILE: &str = "TMA_HOST_CONTEXT_FILE";

/// API base used when no configuration layer sets one
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Log directory used when none is configured
pub const DEFAULT_LOG_DIR: &str = ".";

/// Scheme prefix of the Authorization header value
pub const AUTH_SCHEME: &str = "tma";

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Customer endpoints
pub const EP_PROFILE: &str = "/user/profile";
pub const EP_REFERRAL_STATS: &str = "/referral/stats";
pub const EP_PAYMENT_INIT: &str = "/payment/init";
pub const EP_COURSE_MODULES: &str = "/course/modules";
pub const EP_COURSE_PROGRESS: &str = "/course/progress";

// Admin endpoints
pub const EP_ADMIN_STATS: &str = "/api/admin/stats";
pub const EP_ADMIN_FUNNEL: &str = "/api/admin/funnel";
pub const EP_ADMIN_EVENTS: &str = "/api/admin/events";
pub const EP_ADMIN_USERS: &str = "/api/admin/users";
pub const EP_ADMIN_AUDIENCE_COUNTS: &str = "/api/admin/audience-counts";
pub const EP_ADMIN_BROADCASTS: &str = "/api/admin/broadcasts";
pub const EP_ADMIN_BROADCAST: &str = "/api/admin/broadcast";
pub const EP_ADMIN_UPLOAD_MEDIA: &str = "/api/admin/upload-media-form";

/// Total attempts for a fetch: the first try plus one automatic retry
pub const MAX_FETCH_ATTEMPTS: u32 = 2;

/// Fixed refresh interval of the broadcast history
pub const BROADCAST_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// First staggered delay of the broadcast history poller
pub const POLL_INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Upper bound on polls per poller run
pub const POLL_MAX_ATTEMPTS: u32 = 12;

/// How long a toast stays on screen
pub const TOAST_TTL: Duration = Duration::from_secs(4);

/// Club price shown before a payment has been initialised (so'm)
pub const BASE_CLUB_PRICE: u64 = 97_000;

/// Watch time posted by the "complete module" action (seconds)
pub const COMPLETE_WATCH_TIME_SECS: u64 = 300;
