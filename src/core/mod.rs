//! Core application functionality
//!
//! This module contains the command line side of the effect:
//! - CLI parsing and validation
//! - The user configuration file
//! - Error types
//! - The runner that ties input, effect and output together

pub mod cli;
pub mod config_file;
pub mod errors;
pub mod platform;
pub mod runner;

// Re-export commonly used items
pub use cli::CliArgs;
pub use config_file::ConfigFile;
pub use errors::{EffectError, Result};
pub use runner::run_app;
