//! In-memory player and world directory.

use super::player::PlayerDirectory;
use super::world::WorldDirectory;
use cmdgate_usage::{PlayerRef, WorldRef};
use dashmap::DashMap;
use uuid::Uuid;

/// Directory backed by concurrent maps. Names match case-insensitively.
#[derive(Debug)]
pub struct MemoryDirectory {
    players: DashMap<String, PlayerRef>,
    worlds: DashMap<String, WorldRef>,
    default_world: String,
}

impl MemoryDirectory {
    /// Directory containing only the default world.
    pub fn new(default_world: &str) -> Self {
        let directory = Self {
            players: DashMap::new(),
            worlds: DashMap::new(),
            default_world: default_world.to_lowercase(),
        };
        directory.add_world(default_world);
        directory
    }

    /// Add a player with a fresh id, or return the existing one.
    pub fn add_player(&self, name: &str) -> PlayerRef {
        self.players
            .entry(name.to_lowercase())
            .or_insert_with(|| PlayerRef {
                id: Uuid::new_v4(),
                name: name.to_string(),
            })
            .clone()
    }

    /// Add a world with a fresh id, or return the existing one.
    pub fn add_world(&self, name: &str) -> WorldRef {
        self.worlds
            .entry(name.to_lowercase())
            .or_insert_with(|| WorldRef {
                id: Uuid::new_v4(),
                name: name.to_string(),
            })
            .clone()
    }

    pub fn remove_player(&self, name: &str) -> Option<PlayerRef> {
        self.players.remove(&name.to_lowercase()).map(|(_, p)| p)
    }
}

impl PlayerDirectory for MemoryDirectory {
    fn by_name(&self, name: &str) -> Option<PlayerRef> {
        self.players.get(&name.to_lowercase()).map(|p| p.clone())
    }

    fn by_id(&self, id: Uuid) -> Option<PlayerRef> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.value().clone())
    }
}

impl WorldDirectory for MemoryDirectory {
    fn by_name(&self, name: &str) -> Option<WorldRef> {
        self.worlds.get(&name.to_lowercase()).map(|w| w.clone())
    }

    fn default_world(&self) -> Option<WorldRef> {
        self.worlds.get(&self.default_world).map(|w| w.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let directory = MemoryDirectory::new("world");
        let first = directory.add_player("Steve");
        let second = directory.add_player("STEVE");
        assert_eq!(first, second);
        assert_eq!(PlayerDirectory::by_id(&directory, first.id), Some(first));
        assert!(directory.remove_player("steve").is_some());
        assert!(PlayerDirectory::by_name(&directory, "Steve").is_none());
    }

    #[test]
    fn test_default_world() {
        let directory = MemoryDirectory::new("Overworld");
        assert_eq!(
            directory.default_world().map(|w| w.name),
            Some("Overworld".to_string())
        );
    }
}
