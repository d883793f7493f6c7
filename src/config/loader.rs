use std::path::Path;
use std::str::FromStr;

use super::{AppConfig, ConfigError};

/// Load configuration from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;

    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` resolves a variable name to its value; the server passes
/// `std::env::var`, tests pass a map. Empty values are treated as unset.
pub fn apply_env<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(host) = get("HOST") {
        config.server.host = host;
    }
    if let Some(port) = get("PORT") {
        config.server.port = parse_var("PORT", &port)?;
    }
    if let Some(timeout) = get("UPSTREAM_TIMEOUT_SECONDS") {
        config.upstream.timeout_seconds = parse_var("UPSTREAM_TIMEOUT_SECONDS", &timeout)?;
    }

    let providers = &mut config.providers;
    if let Some(url) = get("UNSPLASH_URL") {
        providers.unsplash.url = url;
    }
    if let Some(key) = get("UNSPLASH_API") {
        providers.unsplash.api_key = Some(key);
    }
    if let Some(url) = get("PIXABAY_URL") {
        providers.pixabay.url = url;
    }
    if let Some(key) = get("PIXABAY_API") {
        providers.pixabay.api_key = Some(key);
    }
    if let Some(url) = get("RUNWARE_URL") {
        providers.runware.url = url;
    }
    if let Some(key) = get("RUNWARE_API") {
        providers.runware.api_key = Some(key);
    }
    if let Some(task_uuid) = get("RUNWARE_UUID") {
        providers.runware.task_uuid = Some(task_uuid);
    }
    if let Some(model) = get("RUNWARE_MODEL") {
        providers.runware.model = Some(model);
    }

    if let Some(max) = get("RATE_LIMIT_MAX") {
        config.rate_limit.max_requests = parse_var("RATE_LIMIT_MAX", &max)?;
    }
    if let Some(window) = get("RATE_LIMIT_WINDOW_SECONDS") {
        config.rate_limit.window_seconds = parse_var("RATE_LIMIT_WINDOW_SECONDS", &window)?;
    }
    if let Some(dir) = get("STATIC_DIR") {
        config.assets.dir = dir;
    }

    Ok(())
}

fn parse_var<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::Validation(format!("{key}={value:?}: {e}")))
}
