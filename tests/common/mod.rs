//! Integration test common infrastructure.
//!
//! Provides a recording command source, a recording exception reporter, and
//! helpers for building a dispatcher over a small command set.

#![allow(dead_code)]

use cmdgate::commands::{CommandHandler, CommandSet, Dispatcher, ExceptionReporter, handler_fn};
use cmdgate::domain::{MemoryDirectory, register_domain_parsers};
use cmdgate::source::{CommandSource, Locatable, PermissionHolder, SourceKind};
use cmdgate::CommandContext;
use cmdgate_usage::{ConversionOptions, ConversionRegistry, Location, WorldRef};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

/// Source that records everything sent to it.
pub struct RecordingSource {
    name: String,
    id: Option<String>,
    kind: SourceKind,
    permissions: Option<HashSet<String>>,
    messages: Mutex<Vec<String>>,
}

impl RecordingSource {
    /// Identifiable player holding exactly `permissions`.
    pub fn player(name: &str, permissions: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            id: Some(name.to_lowercase()),
            kind: SourceKind::Player,
            permissions: Some(permissions.iter().map(|p| p.to_string()).collect()),
            messages: Mutex::new(Vec::new()),
        })
    }

    /// Unidentifiable console holding every permission.
    pub fn console() -> Arc<Self> {
        Arc::new(Self {
            name: "console".to_string(),
            id: None,
            kind: SourceKind::Console,
            permissions: None,
            messages: Mutex::new(Vec::new()),
        })
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn last_message(&self) -> Option<String> {
        self.messages.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

impl PermissionHolder for RecordingSource {
    fn has_permission(&self, node: &str) -> bool {
        self.permissions.as_ref().is_none_or(|p| p.contains(node))
    }
}

impl Locatable for RecordingSource {
    fn location(&self) -> Location {
        Location {
            world: "world".to_string(),
            x: 10.0,
            y: 64.0,
            z: -10.0,
        }
    }

    fn world(&self) -> WorldRef {
        WorldRef {
            id: Uuid::nil(),
            name: "world".to_string(),
        }
    }
}

impl CommandSource for RecordingSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn send(&self, text: &str) {
        self.messages.lock().push(text.to_string());
    }

    fn as_locatable(&self) -> Option<&dyn Locatable> {
        match self.kind {
            SourceKind::Player => Some(self),
            _ => None,
        }
    }
}

/// Reporter that keeps `(what, message)` pairs.
#[derive(Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<(String, String)>>,
}

impl RecordingReporter {
    pub fn reports(&self) -> Vec<(String, String)> {
        self.reports.lock().clone()
    }
}

impl ExceptionReporter for RecordingReporter {
    fn report(&self, what: &str, error: &(dyn Error + 'static)) {
        self.reports
            .lock()
            .push((what.to_string(), cmdgate::commands::cause_chain(error)));
    }
}

/// Shared handle to a recording source as a trait object.
pub fn dyn_source(source: &Arc<RecordingSource>) -> Arc<dyn CommandSource> {
    Arc::clone(source) as Arc<dyn CommandSource>
}

/// Directory with players Steve and Alex and worlds `world` and `nether`.
pub fn directory() -> Arc<MemoryDirectory> {
    let directory = Arc::new(MemoryDirectory::new("world"));
    directory.add_world("nether");
    directory.add_player("Steve");
    directory.add_player("Alex");
    directory
}

/// Built-in converters plus the domain converters over [`directory`].
pub fn conversions() -> Arc<ConversionRegistry> {
    let registry = ConversionRegistry::with_builtins(&ConversionOptions::default());
    let directory = directory();
    register_domain_parsers(&registry, directory.clone(), directory);
    Arc::new(registry)
}

/// Dispatcher over `set` with the test converters.
pub fn dispatcher(set: &CommandSet) -> Dispatcher {
    Dispatcher::new(set.build_table(), conversions())
}

/// Handler that counts its invocations.
pub fn counting(counter: &Arc<AtomicUsize>) -> Arc<dyn CommandHandler> {
    let counter = Arc::clone(counter);
    handler_fn(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
}

/// Handler that stores the last context it saw.
pub fn capturing(slot: &Arc<Mutex<Option<CommandContext>>>) -> Arc<dyn CommandHandler> {
    let slot = Arc::clone(slot);
    handler_fn(move |ctx| {
        *slot.lock() = Some(ctx.clone());
        Ok(())
    })
}

pub fn count(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}
