//! Domain argument types: players, worlds, locations, resource keys.
//!
//! These converters consult host-provided directories. A directory that
//! fails (including by panicking) makes the conversion fail; nothing
//! propagates into the dispatcher.

mod memory;
mod player;
mod resource_key;
mod world;

pub use memory::MemoryDirectory;
pub use player::{PlayerDirectory, PlayerParser};
pub use resource_key::{ResourceKeyParser, parse_resource_key};
pub use world::{LocationParser, WorldDirectory, WorldParser};

use cmdgate_usage::{ConversionRegistry, Value};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

/// Register the `player`, `world`, `location` and `resourcekey` converters.
pub fn register_domain_parsers(
    registry: &ConversionRegistry,
    players: Arc<dyn PlayerDirectory>,
    worlds: Arc<dyn WorldDirectory>,
) {
    registry.register("player", PlayerParser::new(players));
    registry.register("world", WorldParser::new(Arc::clone(&worlds)));
    registry.register("location", LocationParser::new(worlds));
    registry.register("resourcekey", ResourceKeyParser);
    registry.register("resource_key", ResourceKeyParser);
}

/// Run a directory lookup, turning a panic into `None`.
pub(crate) fn guarded<F>(what: &str, lookup: F) -> Option<Value>
where
    F: FnOnce() -> Option<Value>,
{
    match panic::catch_unwind(AssertUnwindSafe(lookup)) {
        Ok(value) => value,
        Err(_) => {
            warn!(converter = %what, "directory lookup panicked; treating as no match");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdgate_usage::ConversionOptions;

    #[test]
    fn test_guarded_swallows_panics() {
        assert_eq!(guarded("test", || Some(Value::Int(1))), Some(Value::Int(1)));
        assert_eq!(guarded("test", || panic!("lookup exploded")), None);
    }

    #[test]
    fn test_registration_keys() {
        let registry = ConversionRegistry::with_builtins(&ConversionOptions::default());
        let directory = Arc::new(MemoryDirectory::new("world"));
        register_domain_parsers(&registry, directory.clone(), directory);
        for key in ["player", "World", "LOCATION", "resourcekey", "resource_key"] {
            assert!(registry.contains(key), "{key} missing");
        }
    }
}
