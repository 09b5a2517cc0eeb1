// lib/src/config/mod.rs

pub mod config_defaults;
pub mod config_loader;
pub mod config_structs;

pub use config_defaults::*;
pub use config_loader::{load_config, CONFIG_ENV_PREFIX};
pub use config_structs::{
    AdmissionConfig, AnalyzerConfig, AudioConfig, BackendConfig, LocationConfig, RoutingConfig,
    SuveraConfig, TriageServiceConfig,
};
