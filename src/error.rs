//! Unified error handling for cmdgate.
//!
//! Two families: [`ConfigurationError`] for registrations rejected at startup,
//! and [`DispatchError`] for invocations that do not run to completion. Every
//! dispatch error carries a metric label and a message fit for the caller.

use cmdgate_usage::UsageError;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Registration errors
// ============================================================================

/// A registration that cannot be accepted.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The usage template does not parse.
    #[error("invalid usage template '{template}': {source}")]
    InvalidUsage {
        /// Template text as registered.
        template: String,
        /// Grammar error from the usage parser.
        source: UsageError,
    },

    /// An alias a path word cannot hold, or a blank alias outside a class.
    #[error("invalid alias '{alias}' for '{template}'")]
    InvalidAlias {
        /// Offending alias.
        alias: String,
        /// Template of the registration declaring it.
        template: String,
    },

    /// `min_args` is larger than a bounded `max_args`.
    #[error("min_args {min} exceeds max_args {max} for '{template}'")]
    ArgumentBounds {
        min: usize,
        max: usize,
        /// Template of the rejected registration.
        template: String,
    },

    /// Class command with two or more empty-alias subcommands; holds the class template.
    #[error("class command '{0}' declares more than one parent subcommand")]
    DuplicateParent(String),
}

// ============================================================================
// Argument errors
// ============================================================================

/// Why the argument words did not fit the usage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// A required positional was not supplied; holds its key.
    #[error("missing required argument <{0}>")]
    Missing(String),

    /// A positional word failed conversion.
    #[error("'{value}' is not a valid {type_name} for <{key}>")]
    Invalid {
        key: String,
        type_name: String,
        value: String,
    },

    /// A valued flag ended the input.
    #[error("flag --{0} requires a value")]
    FlagValueMissing(String),

    /// A flag value failed conversion.
    #[error("'{value}' is not a valid {type_name} for --{key}")]
    InvalidFlag {
        key: String,
        type_name: String,
        value: String,
    },

    /// Fewer positional words than `min_args`.
    #[error("expected at least {min} arguments, got {got}")]
    TooFew { min: usize, got: usize },

    /// More positional words than `max_args`.
    #[error("expected at most {max} arguments, got {got}")]
    TooMany { max: usize, got: usize },
}

// ============================================================================
// Dispatch errors
// ============================================================================

/// Errors that end a dispatch before or during execution.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No alias path matches; holds the first input word.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{source} (usage: {usage})")]
    ArgumentParse {
        /// Full usage line of the resolved path.
        usage: String,
        source: ArgumentError,
    },

    /// The source lacks the command or argument permission node.
    #[error("missing permission {permission}")]
    PermissionDenied { permission: String },

    /// The source ran this command too recently.
    #[error("cooldown active for {remaining:?}")]
    CooldownActive {
        /// Time left until the source may run it again.
        remaining: Duration,
    },

    /// The command is restricted to another kind of source.
    #[error("only {required} sources may run this command")]
    IllegalSource { required: crate::source::SourceKind },

    /// `confirm` with nothing pending, or past the timeout.
    #[error("confirmation expired or invalid")]
    ConfirmationExpiredOrInvalid,

    /// The handler returned an error or panicked.
    #[error("command {alias} failed: {source:#}")]
    InvocationFailure {
        /// Primary alias of the failed command.
        alias: String,
        source: anyhow::Error,
    },
}

impl DispatchError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCommand(_) => "unknown_command",
            Self::ArgumentParse { .. } => "argument_parse",
            Self::PermissionDenied { .. } => "permission_denied",
            Self::CooldownActive { .. } => "cooldown_active",
            Self::IllegalSource { .. } => "illegal_source",
            Self::ConfirmationExpiredOrInvalid => "confirmation_invalid",
            Self::InvocationFailure { .. } => "invocation_failure",
        }
    }

    /// Message shown to the caller.
    ///
    /// Invocation failures stay generic; the cause goes to the reporter.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownCommand(word) => format!("Unknown command: {word}"),
            Self::ArgumentParse { usage, source } => format!("{source}. Usage: /{usage}"),
            Self::PermissionDenied { .. } => {
                "You do not have permission to use this command.".to_string()
            }
            Self::CooldownActive { remaining } => {
                format!("You must wait {} before using this again.", format_remaining(*remaining))
            }
            Self::IllegalSource { required } => {
                format!("This command can only be used by a {required}.")
            }
            Self::ConfirmationExpiredOrInvalid => {
                "Nothing to confirm, or the confirmation has expired.".to_string()
            }
            Self::InvocationFailure { .. } => {
                "An internal error occurred while running this command.".to_string()
            }
        }
    }
}

fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    if secs == 0 {
        return format!("{}ms", remaining.as_millis().max(1));
    }
    match (secs / 3_600, (secs % 3_600) / 60, secs % 60) {
        (0, 0, s) => format!("{s}s"),
        (0, m, s) => format!("{m}m {s}s"),
        (h, m, _) => format!("{h}h {m}m"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceKind;

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            DispatchError::UnknownCommand("x".into()),
            DispatchError::ArgumentParse {
                usage: "tp <player>".into(),
                source: ArgumentError::Missing("player".into()),
            },
            DispatchError::PermissionDenied {
                permission: "a".into(),
            },
            DispatchError::CooldownActive {
                remaining: Duration::from_secs(1),
            },
            DispatchError::IllegalSource {
                required: SourceKind::Player,
            },
            DispatchError::ConfirmationExpiredOrInvalid,
            DispatchError::InvocationFailure {
                alias: "x".into(),
                source: anyhow::anyhow!("boom"),
            },
        ];
        let mut codes: Vec<_> = errors.iter().map(DispatchError::error_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_user_messages() {
        let err = DispatchError::ArgumentParse {
            usage: "tp <player>".into(),
            source: ArgumentError::Missing("player".into()),
        };
        assert_eq!(
            err.user_message(),
            "missing required argument <player>. Usage: /tp <player>"
        );

        let err = DispatchError::InvocationFailure {
            alias: "x".into(),
            source: anyhow::anyhow!("secret detail"),
        };
        assert!(!err.user_message().contains("secret"));
        assert!(err.to_string().contains("secret detail"));
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(Duration::from_millis(250)), "250ms");
        assert_eq!(format_remaining(Duration::from_secs(42)), "42s");
        assert_eq!(format_remaining(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_remaining(Duration::from_secs(7_260)), "2h 1m");
    }
}
