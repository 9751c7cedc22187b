use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides, e.g. `GEOPOST__DATABASE__URL`.
pub const ENV_PREFIX: &str = "GEOPOST";

/// Custom error type for config loading.
#[geopost_derive::geopost_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads a configuration file overlaid with environment overrides.
///
/// 1. **Base File**: `path`, or `server` in the working directory when `None`.
///    The extension is optional; any format the `config` crate recognises works.
/// 2. **Environment Overrides**: variables prefixed with `GEOPOST__`, nested
///    with double underscores (`GEOPOST__DATABASE__URL` maps to `database.url`).
///
/// # Errors
/// * The configuration file cannot be found.
/// * The file or an override does not match the structure of `T`.
///
/// # Example
/// ```rust,no_run
/// use geopost_kernel::config::load_config;
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
    load_layered(path, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .convert_case(config::Case::Snake)
        .try_parsing(true)
}

fn load_layered<T>(path: Option<impl AsRef<Path>>, overrides: Environment) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path = path.map_or_else(|| PathBuf::from("server"), |p| p.as_ref().to_path_buf());

    info!("Loading config from {}", effective_path.display());

    let config = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(overrides)
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
