mod config;
mod error;
mod raw;

pub use config::{
    BillingConfig, CapabilityDefaults, FrontdeskConfig, ProvisioningConfig, StorageConfig,
    load_config, parse_config,
};
pub use error::ConfigError;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "frontdesk.toml";

/// Directory holding the local JSON backend, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = ".frontdesk";
