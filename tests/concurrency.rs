//! Integration tests for concurrent dispatch and table swaps.

mod common;

use cmdgate::commands::{CommandDescriptor, CommandSet, TimeUnit};
use cmdgate::source::CommandSource;
use common::{RecordingSource, count, counting, dispatcher, dyn_source};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::thread;

#[test]
fn test_parallel_dispatch_counts_every_call() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut set = CommandSet::new();
    set.register(CommandDescriptor::new("ping [n{integer}]"), counting(&counter))
        .unwrap();
    let dispatcher = Arc::new(dispatcher(&set));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                let source = dyn_source(&RecordingSource::player(&format!("p{i}"), &[]));
                for n in 0..250 {
                    dispatcher.dispatch(&source, &format!("ping {n}")).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(count(&counter), 2_000);
    assert_eq!(dispatcher.command_stats(), vec![("ping".to_string(), 2_000)]);
}

#[test]
fn test_per_source_cooldowns_under_contention() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut set = CommandSet::new();
    set.register(
        CommandDescriptor::new("heal").cooldown(1, TimeUnit::Hours),
        counting(&counter),
    )
    .unwrap();
    let dispatcher = Arc::new(dispatcher(&set));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                let source = dyn_source(&RecordingSource::player(&format!("p{i}"), &[]));
                dispatcher.dispatch(&source, "heal").unwrap();
                assert!(dispatcher.dispatch(&source, "heal").is_err());
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(count(&counter), 16);
    assert_eq!(dispatcher.cooldowns().len(), 16);
}

#[test]
fn test_install_while_dispatching() {
    let old = Arc::new(AtomicUsize::new(0));
    let new = Arc::new(AtomicUsize::new(0));
    let mut first = CommandSet::new();
    first.register(CommandDescriptor::new("spawn"), counting(&old)).unwrap();
    let mut second = CommandSet::new();
    second.register(CommandDescriptor::new("spawn"), counting(&new)).unwrap();

    let dispatcher = Arc::new(dispatcher(&first));
    let worker = {
        let dispatcher = Arc::clone(&dispatcher);
        thread::spawn(move || {
            let source: Arc<dyn CommandSource> = RecordingSource::console();
            for _ in 0..500 {
                dispatcher.dispatch(&source, "spawn").unwrap();
            }
        })
    };
    dispatcher.install(second.build_table());
    worker.join().unwrap();

    assert_eq!(count(&old) + count(&new), 500);
    let console: Arc<dyn CommandSource> = RecordingSource::console();
    dispatcher.dispatch(&console, "spawn").unwrap();
    assert!(count(&new) >= 1);
}
