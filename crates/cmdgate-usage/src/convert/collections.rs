//! List and map converters.
//!
//! Neither converter ever fails as a whole: unconvertible list elements and
//! malformed map rows are skipped.

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;

use super::ValueParser;
use crate::value::Value;

/// Delimited list, e.g. `1,2,3`.
#[derive(Clone)]
pub struct ListParser {
    delimiter: String,
    element: Option<Arc<dyn ValueParser>>,
    range: Option<Range<usize>>,
}

impl ListParser {
    /// List split on `delimiter`, elements kept as text.
    ///
    /// An empty delimiter falls back to `,`.
    pub fn new(delimiter: impl Into<String>) -> Self {
        let delimiter = delimiter.into();
        Self {
            delimiter: if delimiter.is_empty() { ",".to_string() } else { delimiter },
            element: None,
            range: None,
        }
    }

    /// Convert every element; elements that fail are skipped.
    pub fn with_element(mut self, element: Arc<dyn ValueParser>) -> Self {
        self.element = Some(element);
        self
    }

    /// Keep only converted elements whose index falls in `range`.
    ///
    /// The range is clamped to the number of elements actually converted.
    pub fn with_range(mut self, range: Range<usize>) -> Self {
        self.range = Some(range);
        self
    }
}

impl Default for ListParser {
    fn default() -> Self {
        Self::new(",")
    }
}

impl ValueParser for ListParser {
    fn parse(&self, raw: &str) -> Option<Value> {
        let mut items: Vec<Value> = raw
            .split(self.delimiter.as_str())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .filter_map(|part| match &self.element {
                Some(element) => element.parse(part),
                None => Some(Value::Text(part.to_string())),
            })
            .collect();

        if let Some(range) = &self.range {
            let end = range.end.min(items.len());
            let start = range.start.min(end);
            items.truncate(end);
            items.drain(..start);
        }

        Some(Value::List(items))
    }
}

/// Delimited key/value rows, e.g. `a=1,b=2`.
#[derive(Clone)]
pub struct MapParser {
    row_delimiter: String,
    value_delimiter: String,
    value: Option<Arc<dyn ValueParser>>,
}

impl MapParser {
    /// Rows split on `row_delimiter`, key and value on `value_delimiter`.
    ///
    /// Empty delimiters fall back to `,` and `=`.
    pub fn new(row_delimiter: impl Into<String>, value_delimiter: impl Into<String>) -> Self {
        let row = row_delimiter.into();
        let value = value_delimiter.into();
        Self {
            row_delimiter: if row.is_empty() { ",".to_string() } else { row },
            value_delimiter: if value.is_empty() { "=".to_string() } else { value },
            value: None,
        }
    }

    /// Convert every value; rows whose value fails are dropped.
    pub fn with_value(mut self, value: Arc<dyn ValueParser>) -> Self {
        self.value = Some(value);
        self
    }
}

impl Default for MapParser {
    fn default() -> Self {
        Self::new(",", "=")
    }
}

impl ValueParser for MapParser {
    fn parse(&self, raw: &str) -> Option<Value> {
        let mut rows = BTreeMap::new();
        for row in raw.split(self.row_delimiter.as_str()) {
            let mut parts = row.split(self.value_delimiter.as_str());
            // Exactly one separator per row; anything else is malformed.
            let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            let value = value.trim();
            let converted = match &self.value {
                Some(parser) => parser.parse(value),
                None => Some(Value::Text(value.to_string())),
            };
            if let Some(converted) = converted {
                rows.insert(key.to_string(), converted);
            }
        }
        Some(Value::Map(rows))
    }
}
