//! Error types for usage template parsing.

use thiserror::Error;

/// Convenience type alias for Results using [`UsageError`].
pub type Result<T, E = UsageError> = std::result::Result<T, E>;

/// A usage template that does not match the grammar.
///
/// Token positions are zero-based word indices into the template, with the
/// command path at position 0.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum UsageError {
    /// The template has no tokens at all.
    #[error("usage template is empty")]
    Empty,

    /// The leading literal token is not a valid command path.
    #[error("invalid command path '{0}'")]
    InvalidPath(String),

    /// A token is neither an argument, a flag, nor a flag value type.
    #[error("token {position} '{token}' is not a valid argument or flag")]
    InvalidToken {
        /// The offending token.
        token: String,
        /// Word index of the token.
        position: usize,
    },

    /// A standalone `{Type}` token that does not follow an untyped flag.
    #[error("value type '{token}' at position {position} does not follow an untyped flag")]
    DanglingFlagType {
        /// The offending token.
        token: String,
        /// Word index of the token.
        position: usize,
    },

    /// Two arguments share the same key.
    #[error("duplicate argument key '{0}'")]
    DuplicateArgument(String),

    /// Two flags share the same name or short form.
    #[error("duplicate flag '{0}'")]
    DuplicateFlag(String),

    /// A required argument appears after an optional one.
    #[error("required argument '{0}' follows an optional argument")]
    RequiredAfterOptional(String),
}
