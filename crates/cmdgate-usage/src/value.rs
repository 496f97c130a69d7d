//! Dynamic values produced by argument conversion.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::types::{Location, PlayerRef, ResourceKey, WorldRef};

/// A converted argument or flag value.
///
/// Integer types of every width are widened to [`Value::Int`] and both
/// floating point types to [`Value::Float`]; range checks happen in the
/// converter, not here.
#[derive(Clone)]
pub enum Value {
    /// `true` / `false`.
    Bool(bool),
    /// Any integer type.
    Int(i64),
    /// Any floating point type.
    Float(f64),
    /// A single character.
    Char(char),
    /// Unconverted or string-typed text.
    Text(String),
    /// A strictly formatted UUID.
    Uuid(Uuid),
    /// One constant of an enum converter.
    Enum(String),
    /// Delimited list.
    List(Vec<Value>),
    /// Delimited key/value rows.
    Map(BTreeMap<String, Value>),
    /// A resolved player.
    Player(PlayerRef),
    /// A resolved world.
    World(WorldRef),
    /// A position.
    Location(Location),
    /// A namespaced key.
    ResourceKey(ResourceKey),
    /// Host-defined payload.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Wrap a host-defined value.
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Self::Custom(Arc::new(value))
    }

    /// Short label of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Char(_) => "char",
            Self::Text(_) => "text",
            Self::Uuid(_) => "uuid",
            Self::Enum(_) => "enum",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Player(_) => "player",
            Self::World(_) => "world",
            Self::Location(_) => "location",
            Self::ResourceKey(_) => "resource_key",
            Self::Custom(_) => "custom",
        }
    }

    /// Text or enum constant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Floating point value; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Character value.
    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// UUID value.
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(u) => Some(*u),
            Self::Player(p) => Some(p.id),
            _ => None,
        }
    }

    /// List elements.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Map rows.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(rows) => Some(rows),
            _ => None,
        }
    }

    /// Player value.
    pub fn as_player(&self) -> Option<&PlayerRef> {
        match self {
            Self::Player(p) => Some(p),
            _ => None,
        }
    }

    /// World value.
    pub fn as_world(&self) -> Option<&WorldRef> {
        match self {
            Self::World(w) => Some(w),
            _ => None,
        }
    }

    /// Location value.
    pub fn as_location(&self) -> Option<&Location> {
        match self {
            Self::Location(l) => Some(l),
            _ => None,
        }
    }

    /// Resource key value.
    pub fn as_resource_key(&self) -> Option<&ResourceKey> {
        match self {
            Self::ResourceKey(k) => Some(k),
            _ => None,
        }
    }

    /// Host-defined payload of type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Custom(any) => any.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Uuid(a), Self::Uuid(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Player(a), Self::Player(b)) => a == b,
            (Self::World(a), Self::World(b)) => a == b,
            (Self::Location(a), Self::Location(b)) => a == b,
            (Self::ResourceKey(a), Self::ResourceKey(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Int(i) => write!(f, "Int({i})"),
            Self::Float(x) => write!(f, "Float({x})"),
            Self::Char(c) => write!(f, "Char({c:?})"),
            Self::Text(s) => write!(f, "Text({s:?})"),
            Self::Uuid(u) => write!(f, "Uuid({u})"),
            Self::Enum(s) => write!(f, "Enum({s})"),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Map(rows) => f.debug_tuple("Map").field(rows).finish(),
            Self::Player(p) => f.debug_tuple("Player").field(p).finish(),
            Self::World(w) => f.debug_tuple("World").field(w).finish(),
            Self::Location(l) => f.debug_tuple("Location").field(l).finish(),
            Self::ResourceKey(k) => write!(f, "ResourceKey({k})"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Char(c) => write!(f, "{c}"),
            Self::Text(s) | Self::Enum(s) => f.write_str(s),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Self::Map(rows) => {
                let parts: Vec<String> = rows.iter().map(|(k, v)| format!("{k}={v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            Self::Player(p) => f.write_str(&p.name),
            Self::World(w) => f.write_str(&w.name),
            Self::Location(l) => write!(f, "{l}"),
            Self::ResourceKey(k) => write!(f, "{k}"),
            Self::Custom(_) => f.write_str("<custom>"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_match_variant() {
        assert_eq!(Value::Int(3).as_i64(), Some(3));
        assert_eq!(Value::Int(3).as_f64(), Some(3.0));
        assert_eq!(Value::Text("x".into()).as_i64(), None);
        assert_eq!(Value::Enum("RED".into()).as_str(), Some("RED"));
    }

    #[test]
    fn test_custom_payload_downcasts() {
        #[derive(Debug, PartialEq)]
        struct Kit(&'static str);

        let value = Value::custom(Kit("starter"));
        assert_eq!(value.downcast_ref::<Kit>(), Some(&Kit("starter")));
        assert!(value.downcast_ref::<String>().is_none());
        assert_eq!(value.clone(), value);
    }

    #[test]
    fn test_display_list_and_map() {
        let list = Value::List(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(list.to_string(), "[1, 2]");

        let mut rows = BTreeMap::new();
        rows.insert("a".to_string(), Value::from("1"));
        assert_eq!(Value::Map(rows).to_string(), "{a=1}");
    }
}
