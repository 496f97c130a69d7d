//! Argument value conversion.
//!
//! Every converter implements [`ValueParser`]: `raw text -> Option<Value>`.
//! Failure is always `None`, never an error; the dispatcher decides whether
//! a failed conversion aborts the command (required argument) or is dropped
//! (optional argument).
//!
//! - [`primitives`]: boolean, numeric, char, UUID, enum
//! - [`collections`]: list and map
//! - [`registry`]: the case-insensitive type key lookup

pub mod collections;
pub mod primitives;
pub mod registry;

use crate::value::Value;

pub use collections::{ListParser, MapParser};
pub use primitives::{EnumParser, NumberKind, NumberParser};
pub use registry::ConversionRegistry;

/// Converts one raw word into a typed [`Value`].
pub trait ValueParser: Send + Sync {
    /// Convert `raw`, or `None` if it does not represent a valid value.
    fn parse(&self, raw: &str) -> Option<Value>;
}

impl<F> ValueParser for F
where
    F: Fn(&str) -> Option<Value> + Send + Sync,
{
    fn parse(&self, raw: &str) -> Option<Value> {
        self(raw)
    }
}

/// Delimiters used by the built-in collection converters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOptions {
    /// Element separator for `list`.
    pub list_delimiter: String,
    /// Row separator for `map`.
    pub map_row_delimiter: String,
    /// Key/value separator inside a `map` row.
    pub map_value_delimiter: String,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            list_delimiter: ",".to_string(),
            map_row_delimiter: ",".to_string(),
            map_value_delimiter: "=".to_string(),
        }
    }
}
