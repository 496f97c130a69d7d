//! Domain value types produced by host-registered converters.

use std::fmt;
use uuid::Uuid;

/// Namespace assumed when a resource key omits one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// A resolved player.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerRef {
    /// Stable player id.
    pub id: Uuid,
    /// Display name at resolution time.
    pub name: String,
}

/// A resolved world.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorldRef {
    /// Stable world id.
    pub id: Uuid,
    /// World name.
    pub name: String,
}

/// A position inside a named world.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// World name.
    pub world: String,
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.world, self.x, self.y, self.z)
    }
}

/// A namespaced key, `namespace:value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    /// Owning namespace.
    pub namespace: String,
    /// Path within the namespace.
    pub value: String,
}

impl ResourceKey {
    /// Split `raw` into namespace and value without validating characters.
    ///
    /// A missing namespace resolves to [`DEFAULT_NAMESPACE`].
    pub fn split(raw: &str) -> Option<Self> {
        let (namespace, value) = match raw.split_once(':') {
            Some((ns, value)) => (ns, value),
            None => (DEFAULT_NAMESPACE, raw),
        };
        if namespace.is_empty() || value.is_empty() || value.contains(':') {
            return None;
        }
        Some(Self {
            namespace: namespace.to_string(),
            value: value.to_string(),
        })
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_key_split() {
        let key = ResourceKey::split("stone").unwrap();
        assert_eq!(key.to_string(), "minecraft:stone");

        let key = ResourceKey::split("mymod:copper_ore").unwrap();
        assert_eq!(key.namespace, "mymod");
        assert_eq!(key.value, "copper_ore");

        assert!(ResourceKey::split(":stone").is_none());
        assert!(ResourceKey::split("a:b:c").is_none());
        assert!(ResourceKey::split("mymod:").is_none());
    }
}
