//! Parsing and validation of `weave.toml` configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`WeaveConfig`], from which the diagnostic policy and renderer used during
//! hierarchy resolution are derived.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
