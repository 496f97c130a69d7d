//! Player argument converter.

use super::guarded;
use cmdgate_usage::convert::primitives::parse_uuid;
use cmdgate_usage::{PlayerRef, Value, ValueParser};
use std::sync::Arc;
use uuid::Uuid;

/// Host lookup of known players.
pub trait PlayerDirectory: Send + Sync {
    /// Player with exactly this name.
    fn by_name(&self, name: &str) -> Option<PlayerRef>;

    /// Player with this id.
    fn by_id(&self, id: Uuid) -> Option<PlayerRef>;
}

/// Resolves a player by strict UUID or by name.
pub struct PlayerParser {
    directory: Arc<dyn PlayerDirectory>,
}

impl PlayerParser {
    pub fn new(directory: Arc<dyn PlayerDirectory>) -> Self {
        Self { directory }
    }
}

impl ValueParser for PlayerParser {
    fn parse(&self, raw: &str) -> Option<Value> {
        guarded("player", || {
            let player = match parse_uuid(raw).and_then(|v| v.as_uuid()) {
                Some(id) => self.directory.by_id(id),
                None => self.directory.by_name(raw),
            };
            player.map(Value::Player)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MemoryDirectory;

    #[test]
    fn test_by_name_and_id() {
        let directory = Arc::new(MemoryDirectory::new("world"));
        let steve = directory.add_player("Steve");
        let parser = PlayerParser::new(directory);

        assert_eq!(parser.parse("Steve"), Some(Value::Player(steve.clone())));
        assert_eq!(parser.parse("steve"), Some(Value::Player(steve.clone())));
        assert_eq!(
            parser.parse(&steve.id.to_string()),
            Some(Value::Player(steve))
        );
        assert_eq!(parser.parse("Alex"), None);
        assert_eq!(parser.parse(&Uuid::new_v4().to_string()), None);
    }

    struct Broken;

    impl PlayerDirectory for Broken {
        fn by_name(&self, _name: &str) -> Option<PlayerRef> {
            panic!("directory offline")
        }
        fn by_id(&self, _id: Uuid) -> Option<PlayerRef> {
            None
        }
    }

    #[test]
    fn test_panicking_directory_collapses_to_none() {
        let parser = PlayerParser::new(Arc::new(Broken));
        assert_eq!(parser.parse("Steve"), None);
    }
}
