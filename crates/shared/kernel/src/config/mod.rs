use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_CONFIG_FILE: &str = "server";
const ENV_PREFIX: &str = "DROPCATCH";

#[dropcatch_derive::dropcatch_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads layered configuration: an optional file, then environment overrides.
///
/// 1. **Base file**: `path` without extension (defaults to `server`), resolved by the
///    `config` crate to `server.toml`, `server.json`, ... A missing file is not an error;
///    every section falls back to its defaults.
/// 2. **Environment**: variables prefixed with `DROPCATCH__`, nested with double
///    underscores (e.g. `DROPCATCH__EPP__PORT` maps to `epp.port`).
///
/// # Errors
/// Fails when the file exists but is malformed, or when a value does not match `T`.
///
/// # Example
/// ```rust
/// use dropcatch_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!("Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
