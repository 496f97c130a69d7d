//! # cmdgate-usage
//!
//! Usage-template grammar and argument value conversion for the cmdgate
//! command dispatcher.
//!
//! ## Features
//!
//! - Usage template parsing (`tp <player> [world{World:tp.other}] -s|--silent`)
//! - Ordered argument and flag specifications
//! - A dynamic [`Value`] model for converted arguments
//! - A case-insensitive, runtime-extensible [`ConversionRegistry`] with
//!   built-in primitive, collection, and enum converters

#![deny(clippy::all)]
#![warn(missing_docs)]

//! ## Quick Start
//!
//! ```rust
//! use cmdgate_usage::{ConversionOptions, ConversionRegistry, Usage, Value};
//!
//! let usage = Usage::parse("give <target{player}> [amount{Integer}] --silent").unwrap();
//! assert_eq!(usage.path(), &["give".to_string()]);
//! assert_eq!(usage.arguments().len(), 2);
//! assert_eq!(usage.flags()[0].key, "silent");
//!
//! let registry = ConversionRegistry::with_builtins(&ConversionOptions::default());
//! assert_eq!(registry.convert("integer", "42"), Some(Value::Int(42)));
//! assert_eq!(registry.convert("boolean", "yes"), None);
//! ```

pub mod convert;
pub mod error;
pub mod grammar;
pub mod spec;
pub mod types;
pub mod value;

pub use self::convert::{
    ConversionOptions, ConversionRegistry, EnumParser, ListParser, MapParser, NumberKind,
    NumberParser, ValueParser,
};
pub use self::error::UsageError;
pub use self::spec::{ArgumentSpec, FlagSpec, Usage};
pub use self::types::{Location, PlayerRef, ResourceKey, WorldRef};
pub use self::value::Value;
