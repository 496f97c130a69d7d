//! Namespaced resource key converter.

use cmdgate_usage::{ResourceKey, Value, ValueParser};
use regex::Regex;
use std::sync::OnceLock;

static NAMESPACE: OnceLock<Option<Regex>> = OnceLock::new();
static PATH: OnceLock<Option<Regex>> = OnceLock::new();

fn matches(cell: &'static OnceLock<Option<Regex>>, pattern: &str, text: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(text))
}

/// Parse and validate `namespace:value`; the namespace defaults to `minecraft`.
pub fn parse_resource_key(raw: &str) -> Option<ResourceKey> {
    let key = ResourceKey::split(raw)?;
    let valid = matches(&NAMESPACE, r"^[a-z0-9_.-]+$", &key.namespace)
        && matches(&PATH, r"^[a-z0-9_./-]+$", &key.value);
    valid.then_some(key)
}

/// [`ValueParser`] for resource keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResourceKeyParser;

impl ValueParser for ResourceKeyParser {
    fn parse(&self, raw: &str) -> Option<Value> {
        parse_resource_key(raw).map(Value::ResourceKey)
    }
}
