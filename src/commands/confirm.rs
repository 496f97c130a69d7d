//! Pending confirmations.
//!
//! One slot per source id. A new pending invocation replaces the old one, and
//! taking an entry removes it, so each confirmation runs at most once.

use super::context::CommandContext;
use super::registration::CommandRegistration;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// A fully resolved invocation waiting for `confirm <id>`.
#[derive(Clone)]
pub struct PendingInvocation {
    pub context: CommandContext,
    pub registration: Arc<CommandRegistration>,
}

/// Thread-safe confirmation store.
#[derive(Default)]
pub struct ConfirmationStore {
    pending: DashMap<String, PendingInvocation>,
}

impl ConfirmationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `invocation` for `source_id`. Returns `true` if it replaced one.
    pub fn store(&self, source_id: &str, invocation: PendingInvocation) -> bool {
        let replaced = self
            .pending
            .insert(source_id.to_string(), invocation)
            .is_some();
        debug!(source = %source_id, replaced, "confirmation pending");
        replaced
    }

    /// Remove and return the entry for `source_id`.
    pub fn take(&self, source_id: &str) -> Option<PendingInvocation> {
        self.pending.remove(source_id).map(|(_, invocation)| invocation)
    }

    pub fn contains(&self, source_id: &str) -> bool {
        self.pending.contains_key(source_id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::handler::handler_fn;
    use crate::commands::registration::CommandDescriptor;
    use crate::source::{CommandSource, PermissionHolder, SourceKind};

    struct Nobody;

    impl PermissionHolder for Nobody {
        fn has_permission(&self, _node: &str) -> bool {
            false
        }
    }

    impl CommandSource for Nobody {
        fn name(&self) -> &str {
            "nobody"
        }
        fn id(&self) -> Option<&str> {
            Some("nobody")
        }
        fn kind(&self) -> SourceKind {
            SourceKind::Other
        }
        fn send(&self, _text: &str) {}
    }

    fn pending(alias: &str) -> PendingInvocation {
        let registration =
            CommandRegistration::new(CommandDescriptor::new(alias), handler_fn(|_| Ok(()))).unwrap();
        PendingInvocation {
            context: CommandContext::new(alias, Arc::new(Nobody)),
            registration: Arc::new(registration),
        }
    }

    #[test]
    fn test_store_overwrites_and_take_is_single_use() {
        let store = ConfirmationStore::new();
        assert!(!store.store("nobody", pending("stop")));
        assert!(store.store("nobody", pending("restart")));
        assert_eq!(store.len(), 1);

        let taken = store.take("nobody").unwrap();
        assert_eq!(taken.context.alias(), "restart");
        assert!(store.take("nobody").is_none());
        assert!(!store.contains("nobody"));
    }
}
