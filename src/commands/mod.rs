//! Command registration, resolution and gated dispatch.
//!
//! - [`registration`]: descriptors, single and class registrations, [`CommandSet`]
//! - [`table`]: the alias table built from a command set
//! - [`dispatcher`]: the resolve, parse, gate, confirm, execute pipeline
//! - [`cooldown`] / [`confirm`]: per-source state owned by the dispatcher
//! - [`handler`]: handler trait and instance resolution
//! - [`context`]: per-invocation snapshot handed to handlers

pub mod confirm;
pub mod context;
pub mod cooldown;
pub mod dispatcher;
pub mod handler;
pub mod registration;
pub mod report;
pub mod stats;
pub mod table;

pub use confirm::{ConfirmationStore, PendingInvocation};
pub use context::{CommandContext, CommandValue};
pub use cooldown::CooldownStore;
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use handler::{
    CommandHandler, ComponentResolver, Components, Instance, InstanceBinding, InstanceStrategy,
    NoComponents, handler_fn, method,
};
pub use registration::{
    ClassCommand, ClassCommandRegistration, CommandDescriptor, CommandRegistration, CommandSet,
    Cooldown, Registered, TimeUnit,
};
pub use report::{ExceptionReporter, TracingReporter, cause_chain};
pub use stats::{CommandStats, CommandTimer};
pub use table::{AliasTable, EntryKind, Resolution, TableEntry};
