//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, DispatcherConfig, LoggingConfig)
//! - [`conversion`]: Argument conversion delimiters (ConversionConfig)
//! - [`validation`]: Semantic checks run after parsing

mod conversion;
mod types;
mod validation;

pub use conversion::ConversionConfig;
pub use types::{Config, ConfigError, DispatcherConfig, LoggingConfig};
pub use validation::{ValidationError, validate};
