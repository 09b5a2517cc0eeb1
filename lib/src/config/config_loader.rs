// lib/src/config/config_loader.rs

use std::path::Path;

use config::{Config, Environment, File};
use log::{debug, info};

use crate::config::config_defaults::DEFAULT_CONFIG_FILE_NAME;
use crate::config::config_structs::SuveraConfig;
use crate::errors::Result;

/// Environment overrides look like `SUVERA_BACKEND__BASE_URL`.
pub const CONFIG_ENV_PREFIX: &str = "SUVERA";

/// Builds the effective configuration: compiled defaults, then the TOML file,
/// then environment overrides. An explicit `path` must exist; the default
/// `suvera.toml` in the working directory is optional.
pub fn load_config(path: Option<&Path>) -> Result<SuveraConfig> {
    let defaults = Config::try_from(&SuveraConfig::default())?;

    let file_source = match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            File::from(path).required(true)
        }
        None => {
            debug!("Looking for optional {}", DEFAULT_CONFIG_FILE_NAME);
            File::with_name(DEFAULT_CONFIG_FILE_NAME).required(false)
        }
    };

    let config = Config::builder()
        .add_source(defaults)
        .add_source(file_source)
        .add_source(
            Environment::with_prefix(CONFIG_ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let loaded: SuveraConfig = config.try_deserialize()?;
    loaded.validate()?;
    debug!("Effective configuration: {:?}", loaded);
    Ok(loaded)
}
