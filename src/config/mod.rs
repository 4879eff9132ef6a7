//! Console configuration loading and validation.
//!
//! - [`types`]: config struct definitions (Config, ConsoleConfig, SessionConfig)
//! - [`validation`]: startup checks

mod types;
mod validation;

pub use types::{Config, ConfigError, ConsoleConfig, SessionConfig};
pub use validation::{ValidationError, validate};
