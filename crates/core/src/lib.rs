//! Hawaii Climate Core Library
//!
//! Shared pieces for the climate API binary:
//! - Configuration file discovery and loading (XDG-compliant)
//! - Filesystem checks
//! - Application-wide constants

mod config;
pub mod fs;

pub use config::{find_config_file, load_config, ConfigSource};
pub use fs::is_file;

/// Application name used for XDG and /etc paths
pub const APP_NAME: &str = "hawaii-climate";

/// Default API port
pub const DEFAULT_API_PORT: u16 = 5000;

/// Default location of the pre-populated measurement database
pub const DEFAULT_DATABASE_PATH: &str = "./Resources/hawaii.sqlite";
