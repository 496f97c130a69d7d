//! Type key → converter registry.
//!
//! Lookups happen at dispatch time, so converters registered after a command
//! was registered still apply to it. Keys are case-insensitive: `Integer`,
//! `integer` and `INTEGER` name the same converter.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::collections::{ListParser, MapParser};
use super::primitives::{parse_bool, parse_char, parse_text, parse_uuid, NumberKind, NumberParser};
use super::{ConversionOptions, ValueParser};
use crate::value::Value;

/// Thread-safe, runtime-extensible converter registry.
#[derive(Default)]
pub struct ConversionRegistry {
    parsers: RwLock<HashMap<String, Arc<dyn ValueParser>>>,
}

fn normalize(type_key: &str) -> String {
    type_key.trim().to_ascii_lowercase()
}

impl ConversionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in converter.
    pub fn with_builtins(options: &ConversionOptions) -> Self {
        let registry = Self::new();

        registry.register("string", parse_text);
        registry.register("text", parse_text);
        registry.register("boolean", parse_bool);
        registry.register("bool", parse_bool);
        registry.register("char", parse_char);
        registry.register("character", parse_char);
        registry.register("uuid", parse_uuid);

        registry.register("short", NumberParser::new(NumberKind::Short));
        registry.register("integer", NumberParser::new(NumberKind::Integer));
        registry.register("int", NumberParser::new(NumberKind::Integer));
        registry.register("long", NumberParser::new(NumberKind::Long));
        registry.register("float", NumberParser::new(NumberKind::Float));
        registry.register("double", NumberParser::new(NumberKind::Double));

        registry.register("list", ListParser::new(options.list_delimiter.clone()));
        registry.register(
            "map",
            MapParser::new(
                options.map_row_delimiter.clone(),
                options.map_value_delimiter.clone(),
            ),
        );

        registry
    }

    /// Register `parser` under `type_key`, returning the converter it replaced.
    pub fn register<P>(&self, type_key: &str, parser: P) -> Option<Arc<dyn ValueParser>>
    where
        P: ValueParser + 'static,
    {
        self.register_shared(type_key, Arc::new(parser))
    }

    /// Register an already shared converter.
    pub fn register_shared(
        &self,
        type_key: &str,
        parser: Arc<dyn ValueParser>,
    ) -> Option<Arc<dyn ValueParser>> {
        let key = normalize(type_key);
        let previous = self.parsers.write().insert(key.clone(), parser);
        if previous.is_some() {
            debug!(type_key = %key, "converter replaced");
        }
        previous
    }

    /// Converter registered under `type_key`.
    pub fn get(&self, type_key: &str) -> Option<Arc<dyn ValueParser>> {
        self.parsers.read().get(&normalize(type_key)).cloned()
    }

    /// Whether a converter is registered under `type_key`.
    pub fn contains(&self, type_key: &str) -> bool {
        self.parsers.read().contains_key(&normalize(type_key))
    }

    /// All registered type keys, sorted.
    pub fn type_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.parsers.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Convert `raw` with the converter for `type_key`.
    ///
    /// A type key with no registered converter keeps the raw text.
    pub fn convert(&self, type_key: &str, raw: &str) -> Option<Value> {
        // Clone the Arc so the read lock is not held while a converter runs.
        match self.get(type_key) {
            Some(parser) => parser.parse(raw),
            None => {
                debug!(type_key, "no converter registered, keeping raw text");
                Some(Value::Text(raw.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_case_insensitive() {
        let registry = ConversionRegistry::with_builtins(&ConversionOptions::default());
        assert_eq!(registry.convert("Integer", "5"), Some(Value::Int(5)));
        assert_eq!(registry.convert("INTEGER", "5"), Some(Value::Int(5)));
        assert!(registry.contains("Boolean"));
    }

    #[test]
    fn test_unknown_key_keeps_raw_text() {
        let registry = ConversionRegistry::new();
        assert_eq!(
            registry.convert("message", "hello"),
            Some(Value::Text("hello".into()))
        );
    }

    #[test]
    fn test_register_replaces_and_extends() {
        let registry = ConversionRegistry::with_builtins(&ConversionOptions::default());
        assert!(!registry.contains("color"));

        let replaced = registry.register("color", |raw: &str| {
            matches!(raw, "red" | "blue").then(|| Value::Enum(raw.to_uppercase()))
        });
        assert!(replaced.is_none());
        assert_eq!(registry.convert("Color", "red"), Some(Value::Enum("RED".into())));
        assert_eq!(registry.convert("color", "green"), None);

        let replaced = registry.register("boolean", |raw: &str| Some(Value::Bool(raw == "yes")));
        assert!(replaced.is_some());
        assert_eq!(registry.convert("boolean", "yes"), Some(Value::Bool(true)));
    }

    #[test]
    fn test_builtins_follow_options() {
        let options = ConversionOptions {
            list_delimiter: ";".into(),
            map_row_delimiter: "&".into(),
            map_value_delimiter: ":".into(),
        };
        let registry = ConversionRegistry::with_builtins(&options);

        let list = registry.convert("list", "a;b").unwrap();
        assert_eq!(list.as_list().map(<[Value]>::len), Some(2));

        let map = registry.convert("map", "a:1&b:2").unwrap();
        assert_eq!(map.as_map().map(|m| m.len()), Some(2));
    }

    #[test]
    fn test_type_keys_sorted() {
        let registry = ConversionRegistry::with_builtins(&ConversionOptions::default());
        let keys = registry.type_keys();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));
        assert!(keys.contains(&"uuid".to_string()));
    }
}
