//! Gated command dispatch.
//!
//! Every input runs through the same pipeline:
//!
//! ```text
//! Received -> Resolved -> Parsed -> Gated -> (ConfirmPending | Executing) -> Done
//! ```
//!
//! Any stage may stop the pipeline with a [`DispatchError`]. The dispatcher
//! sends the user-facing message itself, so callers only need the result for
//! bookkeeping.

use super::confirm::{ConfirmationStore, PendingInvocation};
use super::context::CommandContext;
use super::cooldown::CooldownStore;
use super::handler::{ComponentResolver, NoComponents};
use super::registration::CommandRegistration;
use super::report::{ExceptionReporter, TracingReporter};
use super::stats::CommandStats;
use super::table::{AliasTable, TableEntry};
use crate::config::DispatcherConfig;
use crate::error::{ArgumentError, DispatchError};
use crate::source::CommandSource;
use anyhow::anyhow;
use cmdgate_usage::{ConversionRegistry, FlagSpec, Usage, Value};
use parking_lot::RwLock;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, field, info, info_span};

/// How a successful dispatch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The handler ran and returned cleanly.
    Executed { alias: String },
    /// The invocation is parked until `confirm <source_id>`.
    ConfirmationPending { source_id: String },
}

/// Resolves input against the installed alias table and runs handlers.
pub struct Dispatcher {
    table: RwLock<Arc<AliasTable>>,
    conversions: Arc<ConversionRegistry>,
    cooldowns: CooldownStore,
    confirmations: ConfirmationStore,
    components: Arc<dyn ComponentResolver>,
    reporter: Arc<dyn ExceptionReporter>,
    confirm_keyword: String,
    stats: CommandStats,
}

impl Dispatcher {
    pub fn new(table: AliasTable, conversions: Arc<ConversionRegistry>) -> Self {
        Self {
            table: RwLock::new(Arc::new(table)),
            conversions,
            cooldowns: CooldownStore::new(),
            confirmations: ConfirmationStore::new(),
            components: Arc::new(NoComponents),
            reporter: Arc::new(TracingReporter),
            confirm_keyword: DispatcherConfig::default().confirm_command,
            stats: CommandStats::new(),
        }
    }

    /// Apply the `[dispatcher]` config section.
    pub fn with_config(mut self, config: &DispatcherConfig) -> Self {
        self.confirm_keyword = config.confirm_command.trim().to_string();
        self
    }

    /// Host component lookup for method handlers.
    pub fn with_components(mut self, components: Arc<dyn ComponentResolver>) -> Self {
        self.components = components;
        self
    }

    /// Where invocation failures are reported.
    pub fn with_reporter(mut self, reporter: Arc<dyn ExceptionReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Swap in a rebuilt alias table.
    ///
    /// In-flight dispatches finish against the table they started with.
    pub fn install(&self, table: AliasTable) {
        let keys = table.len();
        *self.table.write() = Arc::new(table);
        info!(keys, "alias table installed");
    }

    /// The current alias table.
    pub fn table(&self) -> Arc<AliasTable> {
        Arc::clone(&self.table.read())
    }

    pub fn conversions(&self) -> &Arc<ConversionRegistry> {
        &self.conversions
    }

    pub fn cooldowns(&self) -> &CooldownStore {
        &self.cooldowns
    }

    pub fn confirmations(&self) -> &ConfirmationStore {
        &self.confirmations
    }

    pub fn stats(&self) -> &CommandStats {
        &self.stats
    }

    /// Used commands, most-used first.
    pub fn command_stats(&self) -> Vec<(String, u64)> {
        self.stats.command_stats()
    }

    /// Run `input` on behalf of `source`.
    pub fn dispatch(
        &self,
        source: &Arc<dyn CommandSource>,
        input: &str,
    ) -> Result<DispatchOutcome, DispatchError> {
        let span = info_span!("command.dispatch", source = %source.name(), alias = field::Empty);
        let _enter = span.enter();

        let words: Vec<&str> = input.split_whitespace().collect();
        let result = self.run(source, &words, &span);
        if let Err(e) = &result {
            self.fail(source, e);
        }
        result
    }

    /// Execute the invocation parked for `source_id`.
    pub fn confirm(
        &self,
        source: &Arc<dyn CommandSource>,
        source_id: &str,
    ) -> Result<DispatchOutcome, DispatchError> {
        let span = info_span!("command.confirm", source = %source.name(), id = %source_id);
        let _enter = span.enter();

        let result = self.take_confirmation(source, Some(source_id));
        if let Err(e) = &result {
            self.fail(source, e);
        }
        result
    }

    fn run(
        &self,
        source: &Arc<dyn CommandSource>,
        words: &[&str],
        span: &tracing::Span,
    ) -> Result<DispatchOutcome, DispatchError> {
        let Some(first) = words.first() else {
            return Err(DispatchError::UnknownCommand(String::new()));
        };

        let table = self.table();
        let Some(resolution) = table.resolve(words) else {
            if self.is_confirm_keyword(first, &table) {
                return self.take_confirmation(source, words.get(1).copied());
            }
            return Err(DispatchError::UnknownCommand((*first).to_string()));
        };

        let entry = &resolution.entry;
        span.record("alias", entry.alias());
        debug!(key = %entry.key(), consumed = resolution.consumed, "command resolved");

        let ctx = self.parse(source, entry, &words[resolution.consumed..])?;
        self.gate(source, entry, &ctx)?;

        let registration = entry.registration();
        if registration.requires_confirmation()
            && let Some(id) = source.id()
        {
            self.confirmations.store(
                id,
                PendingInvocation {
                    context: ctx,
                    registration: Arc::clone(registration),
                },
            );
            source.send_with_prefix(&format!(
                "This command requires confirmation. Type /{} {} to continue.",
                self.confirm_keyword, id
            ));
            return Ok(DispatchOutcome::ConfirmationPending {
                source_id: id.to_string(),
            });
        }

        self.execute(ctx, registration)
    }

    fn is_confirm_keyword(&self, word: &str, table: &AliasTable) -> bool {
        if table.is_case_sensitive() {
            word == self.confirm_keyword
        } else {
            word.eq_ignore_ascii_case(&self.confirm_keyword)
        }
    }

    fn take_confirmation(
        &self,
        source: &Arc<dyn CommandSource>,
        requested: Option<&str>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let id = requested
            .or_else(|| source.id())
            .ok_or(DispatchError::ConfirmationExpiredOrInvalid)?;
        if let Some(caller) = source.id()
            && caller != id
        {
            debug!(caller = %caller, id = %id, "confirmation id does not match caller");
            return Err(DispatchError::ConfirmationExpiredOrInvalid);
        }

        let pending = self
            .confirmations
            .take(id)
            .ok_or(DispatchError::ConfirmationExpiredOrInvalid)?;
        self.execute(pending.context, &pending.registration)
    }

    /// Extract flags, check word bounds, then fill arguments in order.
    fn parse(
        &self,
        source: &Arc<dyn CommandSource>,
        entry: &TableEntry,
        words: &[&str],
    ) -> Result<CommandContext, DispatchError> {
        let usage = entry.usage();
        let registration = entry.registration();
        let invalid = |error: ArgumentError| DispatchError::ArgumentParse {
            usage: usage.to_string(),
            source: error,
        };

        let mut ctx = CommandContext::new(entry.alias(), Arc::clone(source));
        let mut positional: Vec<&str> = Vec::with_capacity(words.len());

        let mut i = 0;
        while i < words.len() {
            let word = words[i];
            i += 1;
            let Some((flag, inline)) = match_flag(usage, word) else {
                positional.push(word);
                continue;
            };

            let raw = match inline {
                Some(raw) => raw,
                None if !flag.takes_value() => {
                    ctx.insert_flag(flag.key.clone(), Value::Bool(true));
                    continue;
                }
                None => {
                    let raw = words
                        .get(i)
                        .ok_or_else(|| invalid(ArgumentError::FlagValueMissing(flag.key.clone())))?;
                    i += 1;
                    *raw
                }
            };
            let value = self.conversions.convert(&flag.type_name, raw).ok_or_else(|| {
                invalid(ArgumentError::InvalidFlag {
                    key: flag.key.clone(),
                    type_name: flag.type_name.clone(),
                    value: raw.to_string(),
                })
            })?;
            ctx.insert_flag(flag.key.clone(), value);
        }

        let got = positional.len();
        if got < registration.min_args() {
            return Err(invalid(ArgumentError::TooFew {
                min: registration.min_args(),
                got,
            }));
        }
        if let Some(max) = registration.max_args()
            && got > max
        {
            return Err(invalid(ArgumentError::TooMany { max, got }));
        }

        let mut rest = positional.into_iter();
        for spec in usage.arguments() {
            let Some(raw) = rest.next() else {
                if spec.required {
                    return Err(invalid(ArgumentError::Missing(spec.key.clone())));
                }
                continue;
            };
            match self.conversions.convert(&spec.type_name, raw) {
                Some(value) => ctx.insert_argument(spec.key.clone(), value),
                None if spec.required => {
                    return Err(invalid(ArgumentError::Invalid {
                        key: spec.key.clone(),
                        type_name: spec.type_name.clone(),
                        value: raw.to_string(),
                    }));
                }
                None => debug!(key = %spec.key, raw = %raw, "optional argument dropped"),
            }
        }
        for word in rest {
            ctx.push_extra(word);
        }

        Ok(ctx)
    }

    /// Permission, cooldown, then source kind. No side effects.
    fn gate(
        &self,
        source: &Arc<dyn CommandSource>,
        entry: &TableEntry,
        ctx: &CommandContext,
    ) -> Result<(), DispatchError> {
        let registration = entry.registration();

        if let Some(node) = registration.permission()
            && !source.has_permission(node)
        {
            return Err(DispatchError::PermissionDenied {
                permission: node.to_string(),
            });
        }
        for spec in entry.usage().arguments() {
            if let Some(node) = &spec.permission
                && ctx.has_arg(&spec.key)
                && !source.has_permission(node)
            {
                return Err(DispatchError::PermissionDenied {
                    permission: node.clone(),
                });
            }
        }

        if registration.cooldown().is_enabled()
            && let Some(id) = source.id()
            && let Some(remaining) = self
                .cooldowns
                .remaining(&CooldownStore::key(id, entry.alias()))
        {
            return Err(DispatchError::CooldownActive { remaining });
        }

        if let Some(required) = registration.required_source()
            && source.kind() != required
        {
            return Err(DispatchError::IllegalSource { required });
        }

        Ok(())
    }

    fn execute(
        &self,
        ctx: CommandContext,
        registration: &Arc<CommandRegistration>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let alias = ctx.alias().to_string();

        if let Some(duration) = registration.cooldown().as_duration()
            && let Some(id) = ctx.source().id()
        {
            self.cooldowns.start(CooldownStore::key(id, &alias), duration);
        }

        let target = registration
            .instance()
            .resolve(self.components.as_ref())
            .map(|(instance, strategy)| {
                debug!(strategy, "handler instance resolved");
                instance
            });

        let _timer = self.stats.start(&alias);
        let handler = registration.handler();
        let result = panic::catch_unwind(AssertUnwindSafe(|| handler.invoke(target.as_ref(), &ctx)))
            .unwrap_or_else(|payload| Err(anyhow!("handler panicked: {}", panic_message(&*payload))));

        match result {
            Ok(()) => Ok(DispatchOutcome::Executed { alias }),
            Err(source) => Err(DispatchError::InvocationFailure { alias, source }),
        }
    }

    fn fail(&self, source: &Arc<dyn CommandSource>, error: &DispatchError) {
        let code = error.error_code();
        self.stats.record_error(code);
        debug!(error_code = code, error = %error, "command error");
        if let DispatchError::InvocationFailure { .. } = error {
            self.reporter.report("invocation", error);
        }
        source.send_with_prefix(&error.user_message());
    }
}

/// A declared flag matching `word`, with its inline `=value` if any.
///
/// `--name`, `-name` and `-c` are accepted; the first two may carry `=value`.
fn match_flag<'u, 'w>(usage: &'u Usage, word: &'w str) -> Option<(&'u FlagSpec, Option<&'w str>)> {
    let (rest, double) = match word.strip_prefix("--") {
        Some(long) => (long, true),
        None => (word.strip_prefix('-')?, false),
    };
    let (name, inline) = match rest.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (rest, None),
    };
    if name.is_empty() {
        return None;
    }

    let mut chars = name.chars();
    if !double
        && let (Some(c), None) = (chars.next(), chars.next())
        && let Some(flag) = usage.flag_by_short(c)
    {
        return Some((flag, inline));
    }
    usage.flag_by_name(name).map(|flag| (flag, inline))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage() -> Usage {
        Usage::parse("give <item> [count{Integer}] -s|--silent --reason{text}").unwrap()
    }

    #[test]
    fn test_match_flag_forms() {
        let usage = usage();
        assert_eq!(match_flag(&usage, "-s").map(|(f, v)| (f.key.as_str(), v)), Some(("silent", None)));
        assert_eq!(
            match_flag(&usage, "--silent").map(|(f, v)| (f.key.as_str(), v)),
            Some(("silent", None))
        );
        assert_eq!(
            match_flag(&usage, "--reason=griefing").map(|(f, v)| (f.key.as_str(), v)),
            Some(("reason", Some("griefing")))
        );
    }

    #[test]
    fn test_undeclared_dash_words_are_positional() {
        let usage = usage();
        assert!(match_flag(&usage, "-5").is_none());
        assert!(match_flag(&usage, "--fly").is_none());
        assert!(match_flag(&usage, "-sx").is_none());
        assert!(match_flag(&usage, "-").is_none());
        assert!(match_flag(&usage, "--").is_none());
        assert!(match_flag(&usage, "-=x").is_none());
    }

    #[test]
    fn test_single_dash_long_names() {
        let usage = Usage::parse("kick <target> -silent -reason{text}").unwrap();
        assert_eq!(
            match_flag(&usage, "-silent").map(|(f, v)| (f.key.as_str(), v)),
            Some(("silent", None))
        );
        assert_eq!(
            match_flag(&usage, "-reason=spam").map(|(f, v)| (f.key.as_str(), v)),
            Some(("reason", Some("spam")))
        );
        assert_eq!(
            match_flag(&usage, "--SILENT").map(|(f, v)| (f.key.as_str(), v)),
            Some(("silent", None))
        );
    }

    #[test]
    fn test_panic_message() {
        let payload = panic::catch_unwind(|| panic!("boom")).unwrap_err();
        assert_eq!(panic_message(&*payload), "boom");
        let payload = panic::catch_unwind(|| panic!("{}", String::from("owned"))).unwrap_err();
        assert_eq!(panic_message(&*payload), "owned");
    }
}
