//! Interactive console host.
//!
//! Reads one command per line. Besides regular commands it understands:
//!
//! - `as <name> <command...>`: run as the (simulated) player `name`
//! - `reload`: rebuild the alias table and swap it in
//! - `stats`: print command usage counts
//! - `quit` / `exit`

mod demo;
mod source;

pub use demo::{Roster, Shutdown, WarpBook, register_demo_commands};
pub use source::{ConsoleSource, PlayerSource};

use crate::commands::{CommandSet, Components, Dispatcher};
use crate::config::Config;
use crate::domain::{MemoryDirectory, register_domain_parsers};
use crate::source::CommandSource;
use cmdgate_usage::ConversionRegistry;
use std::sync::Arc;
use tracing::{debug, info};

/// What the read loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Continue,
    Quit,
}

/// Console state: the dispatcher plus the demo world it serves.
pub struct Console {
    dispatcher: Arc<Dispatcher>,
    commands: CommandSet,
    roster: Arc<Roster>,
    warps: Arc<WarpBook>,
    shutdown: Arc<Shutdown>,
    operator: Arc<dyn CommandSource>,
}

impl Console {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let directory = Arc::new(MemoryDirectory::new("world"));
        let conversions = Arc::new(ConversionRegistry::with_builtins(
            &config.conversion.to_options(),
        ));
        register_domain_parsers(&conversions, directory.clone(), directory.clone());

        let mut commands = CommandSet::new().case_sensitive(config.dispatcher.case_sensitive);
        register_demo_commands(&mut commands)?;

        let roster = Arc::new(Roster::new(directory));
        let warps = Arc::new(WarpBook::default());
        let shutdown = Arc::new(Shutdown::default());
        let mut components = Components::new();
        components
            .insert(Arc::clone(&roster))
            .insert(Arc::clone(&warps))
            .insert(Arc::clone(&shutdown));

        let dispatcher = Dispatcher::new(commands.build_table(), conversions)
            .with_config(&config.dispatcher)
            .with_components(Arc::new(components));

        info!(commands = commands.len(), "console ready");
        Ok(Self {
            dispatcher: Arc::new(dispatcher),
            commands,
            roster,
            warps,
            shutdown,
            operator: Arc::new(ConsoleSource),
        })
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn roster(&self) -> &Arc<Roster> {
        &self.roster
    }

    pub fn warps(&self) -> &Arc<WarpBook> {
        &self.warps
    }

    /// Rebuild the alias table from the registered commands.
    pub fn reload(&self) {
        self.dispatcher.install(self.commands.build_table());
    }

    /// Handle one input line.
    pub fn handle_line(&self, line: &str) -> LineOutcome {
        let line = line.trim();
        let (head, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(head, rest)| (head, rest.trim()));

        match head {
            "" => {}
            "quit" | "exit" => return LineOutcome::Quit,
            "reload" => {
                self.reload();
                self.operator.send_with_prefix("Commands reloaded.");
            }
            "stats" => {
                for (alias, count) in self.dispatcher.command_stats() {
                    self.operator.send(&format!("{count:>6}  {alias}"));
                }
            }
            "as" => match rest.split_once(char::is_whitespace) {
                Some((name, command)) => {
                    let source: Arc<dyn CommandSource> = self.roster.join(name);
                    self.run(&source, command);
                }
                None => self.operator.send("usage: as <name> <command...>"),
            },
            _ => self.run(&self.operator, line),
        }

        if self.shutdown.requested() {
            LineOutcome::Quit
        } else {
            LineOutcome::Continue
        }
    }

    fn run(&self, source: &Arc<dyn CommandSource>, command: &str) {
        if let Ok(outcome) = self.dispatcher.dispatch(source, command) {
            debug!(?outcome, "dispatch finished");
        }
    }
}
