//! Command sources for the interactive console.

use crate::source::{CommandSource, Locatable, PermissionHolder, SourceKind};
use cmdgate_usage::{Location, PlayerRef, WorldRef};
use parking_lot::Mutex;

const PREFIX: &str = "[cmdgate]";

/// The operator at the terminal: every permission, no id.
#[derive(Debug, Default)]
pub struct ConsoleSource;

impl PermissionHolder for ConsoleSource {
    fn has_permission(&self, _node: &str) -> bool {
        true
    }
}

impl CommandSource for ConsoleSource {
    fn name(&self) -> &str {
        "console"
    }

    fn id(&self) -> Option<&str> {
        None
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Console
    }

    fn send(&self, text: &str) {
        println!("{text}");
    }

    fn send_with_prefix(&self, text: &str) {
        println!("{PREFIX} {text}");
    }
}

/// A simulated player, used by `as <name> ...`.
///
/// Players hold every permission outside the `admin.` tree.
#[derive(Debug)]
pub struct PlayerSource {
    player: PlayerRef,
    id: String,
    world: WorldRef,
    location: Mutex<Location>,
}

impl PlayerSource {
    pub fn new(player: PlayerRef, world: WorldRef) -> Self {
        let location = Location {
            world: world.name.clone(),
            x: 0.0,
            y: 64.0,
            z: 0.0,
        };
        Self {
            id: player.id.to_string(),
            player,
            world,
            location: Mutex::new(location),
        }
    }

    pub fn player(&self) -> &PlayerRef {
        &self.player
    }

    pub fn move_to(&self, location: Location) {
        *self.location.lock() = location;
    }
}

impl PermissionHolder for PlayerSource {
    fn has_permission(&self, node: &str) -> bool {
        !node.starts_with("admin.")
    }
}

impl Locatable for PlayerSource {
    fn location(&self) -> Location {
        self.location.lock().clone()
    }

    fn world(&self) -> WorldRef {
        self.world.clone()
    }
}

impl CommandSource for PlayerSource {
    fn name(&self) -> &str {
        &self.player.name
    }

    fn id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Player
    }

    fn send(&self, text: &str) {
        println!("-> {}: {text}", self.player.name);
    }

    fn send_with_prefix(&self, text: &str) {
        println!("-> {}: {PREFIX} {text}", self.player.name);
    }

    fn as_locatable(&self) -> Option<&dyn Locatable> {
        Some(self)
    }
}
