//! Identity extraction from the host-provided Mini-App context.
//!
//! The host (Telegram) hands the Mini-App a context object shaped like
//! `{"Telegram": {"WebApp": {"initData": "<signed query string>"}}}`. The
//! `initData` string is the only credential the API accepts. Extraction is
//! total: anything unexpected yields an empty string.

use std::path::PathBuf;

use serde_json::Value;

/// Source of the auth token, consulted fresh on every request
pub trait IdentityProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

impl<F> IdentityProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<String> {
        self()
    }
}

/// Reads `Telegram.WebApp.initData` from a host context object.
///
/// Returns `""` when the context is absent, a segment is missing or not an
/// object, or the value is not a non-empty string.
pub fn init_data_from_context(ctx: Option<&Value>) -> String {
    ctx.and_then(|v| v.get("Telegram"))
        .and_then(|v| v.get("WebApp"))
        .and_then(|v| v.get("initData"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

/// Same as [`init_data_from_context`] for a raw JSON document
pub fn init_data_from_raw(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(ctx) => init_data_from_context(Some(&ctx)),
        Err(_) => String::new(),
    }
}

fn non_empty(token: String) -> Option<String> {
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Where the host context document lives
#[derive(Clone, Debug, PartialEq)]
pub enum ContextSource {
    /// JSON document stored in an environment variable
    Env(String),
    /// JSON document stored in a file
    File(PathBuf),
}

/// Reads the host context on every call; never caches the token
#[derive(Clone, Debug)]
pub struct HostContext {
    source: ContextSource,
}

impl HostContext {
    pub fn new(source: ContextSource) -> Self {
        HostContext { source }
    }

    fn read_raw(&self) -> Option<String> {
        match &self.source {
            ContextSource::Env(var) => std::env::var(var).ok(),
            ContextSource::File(path) => std::fs::read_to_string(path).ok(),
        }
    }
}

impl IdentityProvider for HostContext {
    fn token(&self) -> Option<String> {
        non_empty(init_data_from_raw(self.read_raw().as_deref()))
    }
}

/// A raw `initData` string handed over directly (config or tests)
#[derive(Clone, Debug, Default)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        StaticToken(token.into())
    }
}

impl IdentityProvider for StaticToken {
    fn token(&self) -> Option<String> {
        non_empty(self.0.trim().to_string())
    }
}

/// No host available
#[derive(Clone, Copy, Debug, Default)]
pub struct Anonymous;

impl IdentityProvider for Anonymous {
    fn token(&self) -> Option<String> {
        None
    }
}
