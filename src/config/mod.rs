mod loader;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use loader::{apply_env, load_config};

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
}

/// Proxy server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    10000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// Settings shared by every outbound provider call
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Total request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

/// Per-provider endpoints and credentials
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_unsplash")]
    pub unsplash: SearchProviderConfig,
    #[serde(default = "default_pixabay")]
    pub pixabay: SearchProviderConfig,
    #[serde(default)]
    pub runware: RunwareConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            unsplash: default_unsplash(),
            pixabay: default_pixabay(),
            runware: RunwareConfig::default(),
        }
    }
}

/// A stock-photo search API reached with a GET and a key in the query string
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchProviderConfig {
    pub url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_unsplash() -> SearchProviderConfig {
    SearchProviderConfig {
        url: "https://api.unsplash.com/search/photos".to_string(),
        api_key: None,
    }
}

fn default_pixabay() -> SearchProviderConfig {
    SearchProviderConfig {
        url: "https://pixabay.com/api/".to_string(),
        api_key: None,
    }
}

/// Runware image generation API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunwareConfig {
    #[serde(default = "default_runware_url")]
    pub url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Fixed task identifier; a fresh one is generated per request when unset
    #[serde(default)]
    pub task_uuid: Option<String>,
    /// Model identifier, e.g. "runware:100@1"
    #[serde(default)]
    pub model: Option<String>,
}

fn default_runware_url() -> String {
    "https://api.runware.ai/v1".to_string()
}

impl Default for RunwareConfig {
    fn default() -> Self {
        Self {
            url: default_runware_url(),
            api_key: None,
            task_uuid: None,
            model: None,
        }
    }
}

/// Per-IP limits applied to `/api`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_rate_limit_enabled")]
    pub enabled: bool,
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
}

fn default_rate_limit_enabled() -> bool {
    true
}

fn default_max_requests() -> u32 {
    100
}

fn default_window_seconds() -> u64 {
    15 * 60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_rate_limit_enabled(),
            max_requests: default_max_requests(),
            window_seconds: default_window_seconds(),
        }
    }
}

/// Static asset directory configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetsConfig {
    #[serde(default = "default_assets_dir")]
    pub dir: String,
    #[serde(default = "default_max_age")]
    pub max_age_seconds: u64,
}

fn default_assets_dir() -> String {
    "public".to_string()
}

fn default_max_age() -> u64 {
    7 * 24 * 60 * 60
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: default_assets_dir(),
            max_age_seconds: default_max_age(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_config(path)
    }

    /// Build configuration from defaults, an optional YAML file and the process environment.
    ///
    /// A `.env` file in the working directory is loaded first if present. Environment
    /// variables take precedence over values from the file.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        apply_env(&mut config, |key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the server relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port must be non-zero".to_string()));
        }
        if self.upstream.timeout_seconds == 0 || self.upstream.connect_timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "upstream timeouts must be non-zero".to_string(),
            ));
        }
        if self.rate_limit.max_requests == 0 || self.rate_limit.window_seconds == 0 {
            return Err(ConfigError::Validation(
                "rate_limit.max_requests and rate_limit.window_seconds must be non-zero".to_string(),
            ));
        }

        for (name, raw) in [
            ("providers.unsplash.url", &self.providers.unsplash.url),
            ("providers.pixabay.url", &self.providers.pixabay.url),
            ("providers.runware.url", &self.providers.runware.url),
        ] {
            let url = url::Url::parse(raw)
                .map_err(|e| ConfigError::Validation(format!("{name}: {e}")))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(ConfigError::Validation(format!(
                    "{name}: unsupported scheme '{}'",
                    url.scheme()
                )));
            }
        }

        if let Some(ref task_uuid) = self.providers.runware.task_uuid {
            uuid::Uuid::parse_str(task_uuid).map_err(|e| {
                ConfigError::Validation(format!("providers.runware.task_uuid: {e}"))
            })?;
        }

        Ok(())
    }

    /// Names of providers that are missing credentials and will fail every request
    pub fn unconfigured_providers(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.providers.unsplash.api_key.is_none() {
            missing.push("unsplash");
        }
        if self.providers.pixabay.api_key.is_none() {
            missing.push("pixabay");
        }
        if self.providers.runware.api_key.is_none() || self.providers.runware.model.is_none() {
            missing.push("runware");
        }
        missing
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}
