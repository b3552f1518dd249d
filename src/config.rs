//! Layered configuration: defaults, then `~/.miniapp-console/config.yaml`,
//! then `TMA_*` environment variables, then command-line flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::identity::{Anonymous, ContextSource, HostContext, IdentityProvider, StaticToken};
use crate::messages::ui_events::AppMode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Contents of `config.yaml`; every key is optional
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub mode: Option<AppMode>,
    pub timeout_secs: Option<u64>,
    pub log_dir: Option<PathBuf>,
    /// Raw `initData` string
    pub init_data: Option<String>,
    /// JSON host context document read on every request
    pub host_context_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(FileConfig::default());
        }
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values given on the command line
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub api_url: Option<String>,
    pub admin: bool,
    pub timeout_secs: Option<u64>,
    pub log_dir: Option<PathBuf>,
}

/// Where the auth token comes from
#[derive(Clone, Debug, PartialEq)]
pub enum IdentitySource {
    Static(String),
    Host(ContextSource),
    Anonymous,
}

impl IdentitySource {
    /// Name safe to log; never includes the token
    pub fn kind(&self) -> &'static str {
        match self {
            IdentitySource::Static(_) => "init-data",
            IdentitySource::Host(ContextSource::Env(_)) => "host-context-env",
            IdentitySource::Host(ContextSource::File(_)) => "host-context-file",
            IdentitySource::Anonymous => "anonymous",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Prefixed verbatim to every endpoint path; may be empty
    pub api_url: String,
    pub mode: AppMode,
    pub timeout_secs: u64,
    pub log_dir: PathBuf,
    pub identity: IdentitySource,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api_url: String::from(DEFAULT_API_URL),
            mode: AppMode::Customer,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            identity: IdentitySource::Anonymous,
        }
    }
}

/// `~/.miniapp-console/config.yaml`
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

impl AppConfig {
    /// Load using the process environment
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        Self::load_with_env(overrides, |key| std::env::var(key).ok())
    }

    /// Load with an injectable environment lookup
    pub fn load_with_env<F>(overrides: &Overrides, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match &overrides.config_path {
            // An explicit path must exist
            Some(path) => FileConfig::from_path(path)?,
            None => {
                let path = default_config_path();
                if path.exists() {
                    FileConfig::from_path(&path)?
                } else {
                    FileConfig::default()
                }
            }
        };
        Self::resolve(file, env, overrides)
    }

    /// Merge the layers, later ones winning
    pub fn resolve<F>(file: FileConfig, env: F, overrides: &Overrides) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        // File
        if let Some(url) = file.api_url {
            config.api_url = url;
        }
        if let Some(mode) = file.mode {
            config.mode = mode;
        }
        if let Some(secs) = file.timeout_secs {
            config.timeout_secs = secs;
        }
        if let Some(dir) = file.log_dir {
            config.log_dir = dir;
        }

        // Environment
        if let Some(url) = env(ENV_API_URL) {
            config.api_url = url;
        }

        // Command line
        if let Some(url) = &overrides.api_url {
            config.api_url = url.clone();
        }
        if overrides.admin {
            config.mode = AppMode::Admin;
        }
        if let Some(secs) = overrides.timeout_secs {
            config.timeout_secs = secs;
        }
        if let Some(dir) = &overrides.log_dir {
            config.log_dir = dir.clone();
        }

        if config.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "timeout_secs",
                reason: String::from("must be greater than zero"),
            });
        }
        config.api_url = config.api_url.trim().to_string();

        let init_data = env(ENV_INIT_DATA)
            .or(file.init_data)
            .filter(|t| !t.trim().is_empty());
        let context_file = env(ENV_HOST_CONTEXT_FILE)
            .map(PathBuf::from)
            .or(file.host_context_file);
        config.identity = if let Some(token) = init_data {
            IdentitySource::Static(token)
        } else if let Some(path) = context_file {
            IdentitySource::Host(ContextSource::File(path))
        } else if env(ENV_HOST_CONTEXT).is_some() {
            IdentitySource::Host(ContextSource::Env(ENV_HOST_CONTEXT.to_string()))
        } else {
            IdentitySource::Anonymous
        };

        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the token provider consulted on every request
    pub fn identity_provider(&self) -> Arc<dyn IdentityProvider> {
        match &self.identity {
            IdentitySource::Static(token) => Arc::new(StaticToken::new(token.clone())),
            IdentitySource::Host(source) => Arc::new(HostContext::new(source.clone())),
            IdentitySource::Anonymous => Arc::new(Anonymous),
        }
    }
}
