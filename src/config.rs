//! Gateway configuration
//!
//! Settings are read from a TOML file (explicit path, or the XDG config
//! directory, e.g. `~/.config/transitgate/config.toml` on Linux), then
//! overridden by the `TRANSITGATE_BACKEND_URL` environment variable and CLI
//! flags. Every field has a default, so an empty or missing file is valid.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::Coordinates;
use crate::resilience::{BreakerSettings, ResetPolicy};

/// Environment variable overriding `backend_url`
pub const BACKEND_URL_ENV: &str = "TRANSITGATE_BACKEND_URL";

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Parameters used for the emissions and isochrone parts of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub distance_km: f64,
    pub vehicle_type: String,
    /// Isochrone center as `[lng, lat]`
    pub center: Coordinates,
    pub time_minutes: u32,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            distance_km: 25.0,
            vehicle_type: "bus".to_string(),
            // Accra
            center: [-0.187, 5.6037],
            time_minutes: 30,
        }
    }
}

/// Root configuration for the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL of the backend proxy
    pub backend_url: String,
    /// Per-request deadline for backend calls
    pub request_timeout_secs: u64,
    /// Consecutive failures before a provider's breaker opens
    pub failure_threshold: u32,
    /// Time an open breaker waits before allowing calls again
    pub cooldown_secs: u64,
    pub reset_policy: ResetPolicy,
    /// Maximum number of cached responses
    pub cache_capacity: usize,
    pub snapshot: SnapshotConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 8,
            failure_threshold: crate::resilience::circuit_breaker::DEFAULT_FAILURE_THRESHOLD,
            cooldown_secs: crate::resilience::circuit_breaker::DEFAULT_COOLDOWN.as_secs(),
            reset_policy: ResetPolicy::default(),
            cache_capacity: crate::cache::DEFAULT_CAPACITY,
            snapshot: SnapshotConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Location of the per-user config file, if a home directory is known
    pub fn default_path() -> Option<PathBuf> {
        let project_dirs = ProjectDirs::from("", "", "transitgate")?;
        Some(project_dirs.config_dir().join("config.toml"))
    }

    /// Parses and validates configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GatewayConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolves configuration for the binary
    ///
    /// An explicit path must exist. Without one, the XDG config file is used
    /// when present, else defaults. Environment overrides are applied last.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::load(path)?,
            None => match Self::default_path().filter(|path| path.exists()) {
                Some(path) => {
                    tracing::debug!(path = %path.display(), "Using default config file");
                    Self::load(&path)?
                }
                None => Self::default(),
            },
        };

        config.with_env_overrides(|name| std::env::var(name).ok())
    }

    /// Applies environment overrides using the given variable lookup
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BACKEND_URL_ENV).filter(|url| !url.trim().is_empty()) {
            self.backend_url = url.trim().to_string();
            self.validate()?;
        }
        Ok(self)
    }

    /// Replaces the backend URL, re-validating the result
    pub fn with_backend_url(mut self, url: impl Into<String>) -> Result<Self, ConfigError> {
        self.backend_url = url.into();
        self.validate()?;
        Ok(self)
    }

    /// Semantic checks serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.backend_url).map_err(|e| {
            ConfigError::Invalid(format!("backend_url '{}': {}", self.backend_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "backend_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("request_timeout_secs must be at least 1".into()));
        }
        if self.failure_threshold == 0 {
            return Err(ConfigError::Invalid("failure_threshold must be at least 1".into()));
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::Invalid("cache_capacity must be at least 1".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn breaker_settings(&self) -> BreakerSettings {
        BreakerSettings {
            failure_threshold: self.failure_threshold,
            cooldown: Duration::from_secs(self.cooldown_secs),
            reset_policy: self.reset_policy,
        }
    }
}
