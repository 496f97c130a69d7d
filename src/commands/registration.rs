//! Command registration model.
//!
//! Registrations are built once from a [`CommandDescriptor`] plus a handler,
//! validated eagerly (the usage template is parsed here, not at dispatch), and
//! immutable afterwards. A [`CommandSet`] collects them and builds the
//! [`AliasTable`] the dispatcher resolves against.
//!
//! Two shapes exist:
//!
//! - single-method commands: one handler reachable under each alias;
//! - class commands: top aliases plus subcommands, where a subcommand with the
//!   empty alias `""` becomes the handler for the bare top alias.

use super::handler::{CommandHandler, InstanceBinding};
use super::report::{ExceptionReporter, TracingReporter};
use super::table::AliasTable;
use super::context::CommandContext;
use crate::error::ConfigurationError;
use crate::source::SourceKind;
use cmdgate_usage::Usage;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Unit of a [`Cooldown`] duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Milliseconds,
    /// Default when a cooldown omits its unit.
    #[default]
    Seconds,
    Minutes,
    /// 3600 seconds.
    Hours,
    /// 86400 seconds; no calendar arithmetic.
    Days,
}

impl TimeUnit {
    fn to_duration(self, amount: u64) -> Duration {
        match self {
            Self::Milliseconds => Duration::from_millis(amount),
            Self::Seconds => Duration::from_secs(amount),
            Self::Minutes => Duration::from_secs(amount.saturating_mul(60)),
            Self::Hours => Duration::from_secs(amount.saturating_mul(3_600)),
            Self::Days => Duration::from_secs(amount.saturating_mul(86_400)),
        }
    }
}

/// Minimum interval between invocations by one source.
///
/// A duration of zero or less disables the cooldown.
///
/// ```rust
/// use cmdgate::commands::{Cooldown, TimeUnit};
/// use std::time::Duration;
///
/// assert!(!Cooldown::NONE.is_enabled());
/// assert!(!Cooldown::new(-5, TimeUnit::Days).is_enabled());
/// assert_eq!(
///     Cooldown::new(2, TimeUnit::Hours).as_duration(),
///     Some(Duration::from_secs(7_200))
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Cooldown {
    /// Amount of `unit`; zero or negative disables.
    pub duration: i64,
    /// Seconds when omitted.
    #[serde(default)]
    pub unit: TimeUnit,
}

impl Cooldown {
    /// Disabled cooldown.
    pub const NONE: Self = Self {
        duration: -1,
        unit: TimeUnit::Seconds,
    };

    /// `duration` units of `unit`.
    pub fn new(duration: i64, unit: TimeUnit) -> Self {
        Self { duration, unit }
    }

    /// The cooldown as a [`Duration`], or `None` when disabled.
    pub fn as_duration(&self) -> Option<Duration> {
        u64::try_from(self.duration)
            .ok()
            .filter(|&d| d > 0)
            .map(|d| self.unit.to_duration(d))
    }

    /// Whether a positive duration is set.
    pub fn is_enabled(&self) -> bool {
        self.as_duration().is_some()
    }
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::NONE
    }
}

fn default_max_args() -> i32 {
    -1
}

/// Declarative description of one command, as handed over by the host.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandDescriptor {
    /// Aliases; the template's first token is used when empty.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Usage template, e.g. `tp <player> [world]`.
    pub usage: String,
    /// Minimum number of positional words.
    #[serde(default)]
    pub min_args: usize,
    /// Maximum number of positional words; negative means unbounded.
    #[serde(default = "default_max_args")]
    pub max_args: i32,
    /// Node the source must hold; blank means none.
    #[serde(default)]
    pub permission: Option<String>,
    /// Per-source cooldown, disabled by default.
    #[serde(default)]
    pub cooldown: Cooldown,
    /// Identified sources must follow up with `confirm` before the handler runs.
    #[serde(default)]
    pub requires_confirmation: bool,
    /// Only sources of this kind may run the command.
    #[serde(default)]
    pub required_source: Option<SourceKind>,
    /// Free text for help listings.
    #[serde(default)]
    pub description: Option<String>,
}

impl CommandDescriptor {
    /// Descriptor for `usage` with no aliases, permission or cooldown.
    pub fn new(usage: impl Into<String>) -> Self {
        Self {
            aliases: Vec::new(),
            usage: usage.into(),
            min_args: 0,
            max_args: default_max_args(),
            permission: None,
            cooldown: Cooldown::NONE,
            requires_confirmation: false,
            required_source: None,
            description: None,
        }
    }

    /// Add an alias; multi-word aliases form a path.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Positional word bounds; negative `max` is unbounded.
    pub fn args(mut self, min: usize, max: i32) -> Self {
        self.min_args = min;
        self.max_args = max;
        self
    }

    /// Require `node`.
    pub fn permission(mut self, node: impl Into<String>) -> Self {
        self.permission = Some(node.into());
        self
    }

    /// Per-source cooldown.
    pub fn cooldown(mut self, duration: i64, unit: TimeUnit) -> Self {
        self.cooldown = Cooldown::new(duration, unit);
        self
    }

    /// Require a `confirm` follow-up.
    pub fn confirm(mut self) -> Self {
        self.requires_confirmation = true;
        self
    }

    /// Restrict to sources of `kind`.
    pub fn source(mut self, kind: SourceKind) -> Self {
        self.required_source = Some(kind);
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }
}

fn is_valid_alias_word(word: &str) -> bool {
    !word.starts_with(['-', '*'])
        && !word.contains(['<', '>', '[', ']', '{', '}', '|'])
}

/// Validate aliases; `allow_parent` admits the empty alias.
fn normalize_aliases(
    aliases: &[String],
    usage: &Usage,
    template: &str,
    allow_parent: bool,
) -> Result<Vec<String>, ConfigurationError> {
    if aliases.is_empty() {
        return Ok(vec![usage.path().join(" ")]);
    }

    let mut out: Vec<String> = Vec::with_capacity(aliases.len());
    for alias in aliases {
        let words: Vec<&str> = alias.split_whitespace().collect();
        let valid = if words.is_empty() {
            allow_parent
        } else {
            words.iter().all(|w| is_valid_alias_word(w))
        };
        if !valid {
            return Err(ConfigurationError::InvalidAlias {
                alias: alias.clone(),
                template: template.to_string(),
            });
        }
        let alias = words.join(" ");
        if !out.iter().any(|a| a.eq_ignore_ascii_case(&alias)) {
            out.push(alias);
        }
    }
    Ok(out)
}

/// One validated, immutable command.
pub struct CommandRegistration {
    aliases: Vec<String>,
    template: String,
    usage: Usage,
    min_args: usize,
    max_args: Option<usize>,
    permission: Option<String>,
    cooldown: Cooldown,
    requires_confirmation: bool,
    required_source: Option<SourceKind>,
    description: Option<String>,
    handler: Arc<dyn CommandHandler>,
    instance: InstanceBinding,
}

impl CommandRegistration {
    /// Validate `descriptor` and bind it to `handler`.
    pub fn new(
        descriptor: CommandDescriptor,
        handler: Arc<dyn CommandHandler>,
    ) -> Result<Self, ConfigurationError> {
        Self::build(descriptor, handler, false)
    }

    fn build(
        descriptor: CommandDescriptor,
        handler: Arc<dyn CommandHandler>,
        allow_parent: bool,
    ) -> Result<Self, ConfigurationError> {
        let template = descriptor.usage.trim().to_string();
        let usage = Usage::parse(&template).map_err(|source| ConfigurationError::InvalidUsage {
            template: template.clone(),
            source,
        })?;
        let aliases = normalize_aliases(&descriptor.aliases, &usage, &template, allow_parent)?;

        let max_args = usize::try_from(descriptor.max_args).ok();
        if let Some(max) = max_args
            && descriptor.min_args > max
        {
            return Err(ConfigurationError::ArgumentBounds {
                min: descriptor.min_args,
                max,
                template,
            });
        }

        Ok(Self {
            aliases,
            template,
            usage,
            min_args: descriptor.min_args,
            max_args,
            permission: descriptor.permission.filter(|p| !p.trim().is_empty()),
            cooldown: descriptor.cooldown,
            requires_confirmation: descriptor.requires_confirmation,
            required_source: descriptor.required_source,
            description: descriptor.description,
            handler,
            instance: InstanceBinding::none(),
        })
    }

    /// Attach the strategies used to find the handler's instance.
    pub fn with_instance(mut self, instance: InstanceBinding) -> Self {
        self.instance = instance;
        self
    }

    /// First alias; cooldowns are keyed by the resolved alias instead.
    pub fn primary_alias(&self) -> &str {
        &self.aliases[0]
    }

    /// Normalized aliases, never empty.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Whether this registration answers the bare parent alias.
    pub fn is_parent(&self) -> bool {
        self.aliases.iter().any(String::is_empty)
    }

    /// Trimmed template text.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn usage(&self) -> &Usage {
        &self.usage
    }

    pub fn min_args(&self) -> usize {
        self.min_args
    }

    /// `None` when unbounded.
    pub fn max_args(&self) -> Option<usize> {
        self.max_args
    }

    /// Required node, if any.
    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    pub fn cooldown(&self) -> Cooldown {
        self.cooldown
    }

    pub fn requires_confirmation(&self) -> bool {
        self.requires_confirmation
    }

    /// Source kind allowed to run this, if restricted.
    pub fn required_source(&self) -> Option<SourceKind> {
        self.required_source
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The bound handler.
    pub fn handler(&self) -> &Arc<dyn CommandHandler> {
        &self.handler
    }

    /// Strategies for resolving the handler's receiver.
    pub fn instance(&self) -> &InstanceBinding {
        &self.instance
    }

    /// Usage line under `path`, e.g. `w list [page{Integer}]`.
    pub fn usage_line(&self, path: &str) -> String {
        let tail = self.usage.tail();
        if tail.is_empty() {
            path.to_string()
        } else {
            format!("{path} {tail}")
        }
    }
}

/// Default runner for a bare class alias: lists the subcommands.
struct ParentUsage {
    subcommands: Vec<String>,
}

impl CommandHandler for ParentUsage {
    fn invoke(
        &self,
        _target: Option<&super::handler::Instance>,
        ctx: &CommandContext,
    ) -> anyhow::Result<()> {
        ctx.source().send_with_prefix("This command requires arguments.");
        for line in &self.subcommands {
            ctx.reply(&format!("  {} {}", ctx.alias(), line));
        }
        Ok(())
    }
}

/// Builder for a class command.
pub struct ClassCommand {
    descriptor: CommandDescriptor,
    subcommands: Vec<(CommandDescriptor, Arc<dyn CommandHandler>)>,
    instance: InstanceBinding,
}

impl ClassCommand {
    /// Class with top aliases and permission from `descriptor`.
    pub fn new(descriptor: CommandDescriptor) -> Self {
        Self {
            descriptor,
            subcommands: Vec::new(),
            instance: InstanceBinding::none(),
        }
    }

    /// Add a subcommand; its template's first token names it unless aliases
    /// are given. Alias `""` marks the parent handler.
    pub fn subcommand(mut self, descriptor: CommandDescriptor, handler: Arc<dyn CommandHandler>) -> Self {
        self.subcommands.push((descriptor, handler));
        self
    }

    /// Instance shared by every subcommand.
    pub fn instance(mut self, instance: InstanceBinding) -> Self {
        self.instance = instance;
        self
    }
}

/// A validated class command.
pub struct ClassCommandRegistration {
    root: Arc<CommandRegistration>,
    subcommands: Vec<Arc<CommandRegistration>>,
}

impl ClassCommandRegistration {
    fn build(class: ClassCommand) -> Result<Self, ConfigurationError> {
        let ClassCommand {
            descriptor,
            subcommands,
            instance,
        } = class;
        let class_permission = descriptor.permission.clone();

        let mut built: Vec<Arc<CommandRegistration>> = Vec::with_capacity(subcommands.len());
        for (mut sub, handler) in subcommands {
            if sub.permission.is_none() {
                sub.permission = class_permission.clone();
            }
            let registration =
                CommandRegistration::build(sub, handler, true)?.with_instance(instance.clone());
            built.push(Arc::new(registration));
        }

        let parents = built.iter().filter(|s| s.is_parent()).count();
        if parents > 1 {
            return Err(ConfigurationError::DuplicateParent(descriptor.usage.clone()));
        }

        let hint = ParentUsage {
            subcommands: built
                .iter()
                .flat_map(|s| {
                    s.aliases()
                        .iter()
                        .filter(|a| !a.is_empty())
                        .map(|a| s.usage_line(a))
                        .collect::<Vec<_>>()
                })
                .collect(),
        };
        let root = CommandRegistration::build(descriptor, Arc::new(hint), false)?;

        Ok(Self {
            root: Arc::new(root),
            subcommands: built,
        })
    }

    /// Class-level registration; also the default runner for bare aliases.
    pub fn root(&self) -> &Arc<CommandRegistration> {
        &self.root
    }

    /// Subcommands in declaration order, parent included.
    pub fn subcommands(&self) -> &[Arc<CommandRegistration>] {
        &self.subcommands
    }

    /// Runner for a bare top alias: the `""` subcommand, else the default.
    pub fn parent_runner(&self) -> &Arc<CommandRegistration> {
        self.subcommands
            .iter()
            .find(|s| s.is_parent())
            .unwrap_or(&self.root)
    }
}

/// A registered command of either shape.
#[derive(Clone)]
pub enum Registered {
    /// One handler under each alias.
    Single(Arc<CommandRegistration>),
    /// Top aliases with subcommands.
    Class(Arc<ClassCommandRegistration>),
}

/// The current registration set.
pub struct CommandSet {
    registered: Vec<Registered>,
    reporter: Arc<dyn ExceptionReporter>,
    case_sensitive: bool,
}

impl Default for CommandSet {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandSet {
    /// Empty, case-insensitive set reporting through tracing.
    pub fn new() -> Self {
        Self {
            registered: Vec::new(),
            reporter: Arc::new(TracingReporter),
            case_sensitive: false,
        }
    }

    /// Where rejected registrations are reported.
    pub fn with_reporter(mut self, reporter: Arc<dyn ExceptionReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Match alias words case-sensitively in tables built from this set.
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Register a single-method command.
    pub fn register(
        &mut self,
        descriptor: CommandDescriptor,
        handler: Arc<dyn CommandHandler>,
    ) -> Result<Arc<CommandRegistration>, ConfigurationError> {
        self.register_with(descriptor, handler, InstanceBinding::none())
    }

    /// Register a single-method command with an instance binding.
    pub fn register_with(
        &mut self,
        descriptor: CommandDescriptor,
        handler: Arc<dyn CommandHandler>,
        instance: InstanceBinding,
    ) -> Result<Arc<CommandRegistration>, ConfigurationError> {
        let usage = descriptor.usage.clone();
        let registration = CommandRegistration::new(descriptor, handler)
            .map(|r| Arc::new(r.with_instance(instance)))
            .map_err(|e| self.reject(&usage, e))?;
        self.registered.push(Registered::Single(Arc::clone(&registration)));
        Ok(registration)
    }

    /// Register a class command.
    pub fn register_class(
        &mut self,
        class: ClassCommand,
    ) -> Result<Arc<ClassCommandRegistration>, ConfigurationError> {
        let usage = class.descriptor.usage.clone();
        let registration = ClassCommandRegistration::build(class)
            .map(Arc::new)
            .map_err(|e| self.reject(&usage, e))?;
        self.registered.push(Registered::Class(Arc::clone(&registration)));
        Ok(registration)
    }

    fn reject(&self, usage: &str, error: ConfigurationError) -> ConfigurationError {
        warn!(usage = %usage, error = %error, "command registration rejected");
        self.reporter.report("registration", &error);
        error
    }

    /// Number of registrations; a class counts once.
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// Registrations in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &Registered> {
        self.registered.iter()
    }

    /// Build an alias table from every registration, in registration order.
    pub fn build_table(&self) -> AliasTable {
        let mut table = AliasTable::new(self.case_sensitive);
        for registered in &self.registered {
            match registered {
                Registered::Single(r) => table.insert_single(r),
                Registered::Class(c) => table.insert_class(c),
            }
        }
        info!(
            registrations = self.registered.len(),
            keys = table.len(),
            "alias table built"
        );
        table
    }
}
