//! Per-invocation command context.
//!
//! A [`CommandContext`] is a snapshot taken after parsing: converted
//! arguments and flags, the source that issued the command, and the source's
//! position at dispatch time. It is cheap to clone and is what a pending
//! confirmation stores for later execution.

use crate::source::CommandSource;
use cmdgate_usage::{Location, Value, WorldRef};
use std::fmt;
use std::sync::Arc;

/// One converted argument or flag.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandValue {
    /// Positional argument.
    Argument { key: String, value: Value },
    /// Flag, `Value::Bool(true)` for presence flags.
    Flag { key: String, value: Value },
}

impl CommandValue {
    pub fn key(&self) -> &str {
        match self {
            Self::Argument { key, .. } | Self::Flag { key, .. } => key,
        }
    }

    pub fn value(&self) -> &Value {
        match self {
            Self::Argument { value, .. } | Self::Flag { value, .. } => value,
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, Self::Flag { .. })
    }
}

/// Snapshot handed to a handler.
#[derive(Clone)]
pub struct CommandContext {
    alias: String,
    args: Vec<CommandValue>,
    flags: Vec<CommandValue>,
    extra: Vec<String>,
    source: Arc<dyn CommandSource>,
    location: Option<Location>,
    world: Option<WorldRef>,
}

impl CommandContext {
    /// Empty context for `source`, resolved under `alias`.
    ///
    /// Snapshots the source's location and world if it is locatable.
    pub fn new(alias: impl Into<String>, source: Arc<dyn CommandSource>) -> Self {
        let (location, world) = match source.as_locatable() {
            Some(locatable) => (Some(locatable.location()), Some(locatable.world())),
            None => (None, None),
        };
        Self {
            alias: alias.into(),
            args: Vec::new(),
            flags: Vec::new(),
            extra: Vec::new(),
            source,
            location,
            world,
        }
    }

    /// Builder form of [`insert_argument`](Self::insert_argument).
    pub fn with_argument(mut self, key: impl Into<String>, value: Value) -> Self {
        self.insert_argument(key, value);
        self
    }

    /// Builder form of [`insert_flag`](Self::insert_flag).
    pub fn with_flag(mut self, key: impl Into<String>, value: Value) -> Self {
        self.insert_flag(key, value);
        self
    }

    /// Store an argument; an existing argument with the same key is replaced.
    pub fn insert_argument(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        self.args.retain(|a| a.key() != key);
        self.args.push(CommandValue::Argument { key, value });
    }

    /// Store a flag; a repeated flag keeps its last value.
    pub fn insert_flag(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        self.flags.retain(|f| f.key() != key);
        self.flags.push(CommandValue::Flag { key, value });
    }

    pub(crate) fn push_extra(&mut self, word: &str) {
        self.extra.push(word.to_string());
    }

    /// Literal path the command was resolved under, e.g. `warp list`.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Converted arguments, in template order.
    pub fn args(&self) -> &[CommandValue] {
        &self.args
    }

    /// Converted flags, in input order.
    pub fn flags(&self) -> &[CommandValue] {
        &self.flags
    }

    /// Words left over after every argument was filled.
    pub fn extra(&self) -> &[String] {
        &self.extra
    }

    pub fn arg(&self, key: &str) -> Option<&Value> {
        self.args.iter().find(|a| a.key() == key).map(CommandValue::value)
    }

    pub fn has_arg(&self, key: &str) -> bool {
        self.arg(key).is_some()
    }

    pub fn flag(&self, key: &str) -> Option<&Value> {
        self.flags.iter().find(|f| f.key() == key).map(CommandValue::value)
    }

    pub fn has_flag(&self, key: &str) -> bool {
        self.flag(key).is_some()
    }

    pub fn source(&self) -> &Arc<dyn CommandSource> {
        &self.source
    }

    /// Source position at dispatch time.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Source world at dispatch time.
    pub fn world(&self) -> Option<&WorldRef> {
        self.world.as_ref()
    }

    pub fn has_permission(&self, node: &str) -> bool {
        self.source.has_permission(node)
    }

    /// Send `text` to the source.
    pub fn reply(&self, text: &str) {
        self.source.send(text);
    }
}

impl fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("alias", &self.alias)
            .field("source", &self.source.name())
            .field("args", &self.args)
            .field("flags", &self.flags)
            .field("extra", &self.extra)
            .field("location", &self.location)
            .finish()
    }
}
