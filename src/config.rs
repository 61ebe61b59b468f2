//! Configuration loaded from `checkstate.toml`.
//!
//! [`StoreConfig`] holds everything needed to reach the state store and to
//! identify this process as a writer. Values missing from the file use
//! defaults. `POD_NAME` (falling back to `HOSTNAME`) overrides the pod
//! identity and `CHECKSTATE_TOKEN` overrides the bearer token.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILE: &str = "checkstate.toml";

/// Top-level configuration loaded from `checkstate.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the API server.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_api_group")]
    pub api_group: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Identity stamped on every check state this process writes.
    #[serde(default)]
    pub pod_name: String,

    /// Bearer token for the API server.
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_base_url() -> String {
    "https://kubernetes.default.svc".to_string()
}

fn default_api_group() -> String {
    "checkstate.dev".to_string()
}

fn default_api_version() -> String {
    "v1".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_group: default_api_group(),
            api_version: default_api_version(),
            pod_name: String::new(),
            token: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

impl StoreConfig {
    /// Loads `checkstate.toml` from the current directory, or defaults if it
    /// does not exist, then applies environment overrides.
    pub fn load() -> Result<Self> {
        let path = Path::new(CONFIG_FILE);
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parses a config file without consulting the environment.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = toml::from_str::<StoreConfig>(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(pod) = non_empty("POD_NAME").or_else(|| non_empty("HOSTNAME")) {
            self.pod_name = pod;
        }
        if let Some(token) = non_empty("CHECKSTATE_TOKEN") {
            self.token = Some(token);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            bail!("base_url must not be empty");
        }
        if self.api_group.trim().is_empty() || self.api_version.trim().is_empty() {
            bail!("api_group and api_version must not be empty");
        }
        if self.pod_name.trim().is_empty() {
            bail!("pod_name is not set; configure it or export POD_NAME");
        }
        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            bail!("timeouts must be greater than zero");
        }
        Ok(())
    }
}
