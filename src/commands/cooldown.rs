//! Per-source command cooldowns.
//!
//! Entries are keyed `source_id$alias` and hold an expiry instant. Expired
//! entries are pruned lazily when their key is checked again; there is no
//! background sweep.

use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Thread-safe cooldown store.
#[derive(Debug, Default)]
pub struct CooldownStore {
    expiries: DashMap<String, Instant>,
}

impl CooldownStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store key for a source and resolved alias.
    pub fn key(source_id: &str, alias: &str) -> String {
        format!("{source_id}${alias}")
    }

    /// Time left on `key`, or `None` if it is not cooling down.
    pub fn remaining(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let expiry = *self.expiries.get(key)?;
        if now < expiry {
            return Some(expiry - now);
        }
        self.expiries.remove_if(key, |_, e| *e <= now);
        None
    }

    /// Start (or restart) the cooldown for `key`.
    pub fn start(&self, key: String, duration: Duration) {
        debug!(key = %key, ?duration, "cooldown started");
        self.expiries.insert(key, Instant::now() + duration);
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn prune_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.expiries.len();
        self.expiries.retain(|_, expiry| *expiry > now);
        before.saturating_sub(self.expiries.len())
    }

    pub fn len(&self) -> usize {
        self.expiries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expiries.is_empty()
    }
}
