//! Command source capabilities.
//!
//! The dispatcher only talks to the caller through these traits: it sends
//! text, asks for permissions, and (when available) snapshots the caller's
//! position. Hosts implement them for players, the console, and anything else
//! that can issue commands.

use cmdgate_usage::{Location, WorldRef};
use serde::Deserialize;
use std::fmt;

/// Permission queries.
pub trait PermissionHolder {
    /// Whether the holder has `node`.
    fn has_permission(&self, node: &str) -> bool;
}

/// Sources that have a position in a world.
pub trait Locatable {
    /// Current position.
    fn location(&self) -> Location;

    /// Current world.
    fn world(&self) -> WorldRef;
}

/// Kind of caller, used by source-restricted commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// An in-game player.
    Player,
    /// The server console.
    Console,
    /// A command block or other automated in-world trigger.
    CommandBlock,
    /// A remote administration connection.
    Remote,
    /// Anything else.
    Other,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Player => "player",
            Self::Console => "console",
            Self::CommandBlock => "command block",
            Self::Remote => "remote",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Anything that can issue commands and receive replies.
pub trait CommandSource: PermissionHolder + Send + Sync {
    /// Display name, used in logs.
    fn name(&self) -> &str;

    /// Stable id, if the source is identifiable.
    ///
    /// Cooldowns and confirmations only apply to identifiable sources.
    fn id(&self) -> Option<&str>;

    /// What kind of caller this is.
    fn kind(&self) -> SourceKind;

    /// Send a line of text.
    fn send(&self, text: &str);

    /// Send a line of text behind the host's message prefix.
    fn send_with_prefix(&self, text: &str) {
        self.send(text);
    }

    /// Position capability, if the source has one.
    fn as_locatable(&self) -> Option<&dyn Locatable> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Console;

    impl PermissionHolder for Console {
        fn has_permission(&self, _node: &str) -> bool {
            true
        }
    }

    impl CommandSource for Console {
        fn name(&self) -> &str {
            "console"
        }
        fn id(&self) -> Option<&str> {
            None
        }
        fn kind(&self) -> SourceKind {
            SourceKind::Console
        }
        fn send(&self, _text: &str) {}
    }

    #[test]
    fn test_defaults() {
        let console = Console;
        assert!(console.as_locatable().is_none());
        assert!(console.id().is_none());
        assert_eq!(console.kind().to_string(), "console");
    }

    #[test]
    fn test_source_kind_deserializes_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            kind: SourceKind,
        }
        let w: Wrapper = toml::from_str("kind = \"command_block\"").unwrap();
        assert_eq!(w.kind, SourceKind::CommandBlock);
    }
}
