//! World and location converters.

use super::guarded;
use cmdgate_usage::{Location, Value, ValueParser, WorldRef};
use std::sync::Arc;

/// Host lookup of loaded worlds.
pub trait WorldDirectory: Send + Sync {
    /// World with this name.
    fn by_name(&self, name: &str) -> Option<WorldRef>;

    /// World used for coordinates without an explicit world.
    fn default_world(&self) -> Option<WorldRef>;
}

/// Resolves a world by name.
pub struct WorldParser {
    directory: Arc<dyn WorldDirectory>,
}

impl WorldParser {
    pub fn new(directory: Arc<dyn WorldDirectory>) -> Self {
        Self { directory }
    }
}

impl ValueParser for WorldParser {
    fn parse(&self, raw: &str) -> Option<Value> {
        guarded("world", || self.directory.by_name(raw).map(Value::World))
    }
}

/// Parses `world,x,y,z` or `x,y,z` (default world).
pub struct LocationParser {
    directory: Arc<dyn WorldDirectory>,
}

impl LocationParser {
    pub fn new(directory: Arc<dyn WorldDirectory>) -> Self {
        Self { directory }
    }
}

fn coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl ValueParser for LocationParser {
    fn parse(&self, raw: &str) -> Option<Value> {
        let parts: Vec<&str> = raw.split(',').collect();
        let (world, coords) = match parts.as_slice() {
            [world, coords @ ..] if coords.len() == 3 => (Some(*world), coords),
            coords if coords.len() == 3 => (None, coords),
            _ => return None,
        };
        let x = coordinate(coords[0])?;
        let y = coordinate(coords[1])?;
        let z = coordinate(coords[2])?;

        guarded("location", || {
            let world = match world {
                Some(name) => self.directory.by_name(name.trim())?,
                None => self.directory.default_world()?,
            };
            Some(Value::Location(Location {
                world: world.name,
                x,
                y,
                z,
            }))
        })
    }
}
