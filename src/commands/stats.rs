//! Command usage statistics and execution timing.

use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Counter {
    calls: AtomicU64,
    nanos: AtomicU64,
}

/// Per-alias invocation counters and per-error-code counters.
#[derive(Debug, Default)]
pub struct CommandStats {
    commands: DashMap<String, Arc<Counter>>,
    errors: DashMap<&'static str, AtomicU64>,
}

impl CommandStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, alias: &str) -> Arc<Counter> {
        if let Some(counter) = self.commands.get(alias) {
            return Arc::clone(&counter);
        }
        Arc::clone(&self.commands.entry(alias.to_string()).or_default())
    }

    /// Count one execution of `alias` and time it until the guard drops.
    pub fn start(&self, alias: &str) -> CommandTimer {
        let counter = self.counter(alias);
        counter.calls.fetch_add(1, Ordering::Relaxed);
        CommandTimer {
            counter,
            start: Instant::now(),
        }
    }

    /// Count one dispatch that ended in error `code`.
    pub fn record_error(&self, code: &'static str) {
        self.errors
            .entry(code)
            .or_default()
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Used commands, most-used first.
    pub fn command_stats(&self) -> Vec<(String, u64)> {
        let mut stats: Vec<_> = self
            .commands
            .iter()
            .map(|e| (e.key().clone(), e.value().calls.load(Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0)
            .collect();
        stats.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        stats
    }

    /// Mean execution time of `alias`.
    pub fn mean_latency(&self, alias: &str) -> Option<Duration> {
        let counter = self.commands.get(alias)?;
        let calls = counter.calls.load(Ordering::Relaxed);
        (calls > 0).then(|| Duration::from_nanos(counter.nanos.load(Ordering::Relaxed) / calls))
    }

    /// Error counts, sorted by code.
    pub fn error_stats(&self) -> Vec<(&'static str, u64)> {
        let mut stats: Vec<_> = self
            .errors
            .iter()
            .map(|e| (*e.key(), e.value().load(Ordering::Relaxed)))
            .collect();
        stats.sort_by_key(|(code, _)| *code);
        stats
    }
}

/// Guard for timing command execution.
///
/// Records latency when dropped.
pub struct CommandTimer {
    counter: Arc<Counter>,
    start: Instant,
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let nanos = u64::try_from(self.start.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.counter.nanos.fetch_add(nanos, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_sorted_descending() {
        let stats = CommandStats::new();
        drop(stats.start("spawn"));
        drop(stats.start("tp"));
        drop(stats.start("tp"));
        assert_eq!(
            stats.command_stats(),
            vec![("tp".to_string(), 2), ("spawn".to_string(), 1)]
        );
        assert!(stats.mean_latency("tp").is_some());
        assert!(stats.mean_latency("fly").is_none());
    }

    #[test]
    fn test_error_counts() {
        let stats = CommandStats::new();
        stats.record_error("unknown_command");
        stats.record_error("unknown_command");
        stats.record_error("permission_denied");
        assert_eq!(
            stats.error_stats(),
            vec![("permission_denied", 1), ("unknown_command", 2)]
        );
    }
}
