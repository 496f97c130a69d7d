//! # cmdgate
//!
//! Command dispatch engine: usage templates become argument grammars,
//! registrations become an alias table, and raw input runs through a gated
//! pipeline (permission, cooldown, source kind, optional confirmation)
//! before the handler is invoked.
//!
//! ```rust
//! use cmdgate::commands::{CommandDescriptor, CommandSet, Dispatcher, handler_fn};
//! use cmdgate_usage::{ConversionOptions, ConversionRegistry};
//! use std::sync::Arc;
//!
//! let mut set = CommandSet::new();
//! set.register(
//!     CommandDescriptor::new("greet <name>").permission("cmd.greet"),
//!     handler_fn(|ctx| {
//!         ctx.reply(&format!("hello {}", ctx.arg("name").map(ToString::to_string).unwrap_or_default()));
//!         Ok(())
//!     }),
//! )
//! .unwrap();
//!
//! let conversions = Arc::new(ConversionRegistry::with_builtins(&ConversionOptions::default()));
//! let dispatcher = Dispatcher::new(set.build_table(), conversions);
//! assert_eq!(dispatcher.table().len(), 1);
//! ```

pub mod commands;
pub mod config;
pub mod console;
pub mod domain;
pub mod error;
pub mod source;

pub use commands::{CommandContext, CommandDescriptor, CommandSet, DispatchOutcome, Dispatcher};
pub use error::{ArgumentError, ConfigurationError, DispatchError};
pub use source::{CommandSource, Locatable, PermissionHolder, SourceKind};
