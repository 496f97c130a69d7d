//! Exception reporting.

use std::error::Error;
use tracing::error;

/// Receives registration and invocation failures with their full cause chain.
pub trait ExceptionReporter: Send + Sync {
    /// Report `error`, raised while doing `what`.
    fn report(&self, what: &str, error: &(dyn Error + 'static));
}

/// Reporter that logs through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ExceptionReporter for TracingReporter {
    fn report(&self, what: &str, error: &(dyn Error + 'static)) {
        error!(what = %what, chain = %cause_chain(error), "{}", error);
    }
}

/// `outer: inner: root` rendering of an error and its sources.
pub fn cause_chain(error: &(dyn Error + 'static)) -> String {
    let mut parts = vec![error.to_string()];
    let mut current = error.source();
    while let Some(cause) = current {
        parts.push(cause.to_string());
        current = cause.source();
    }
    parts.join(": ")
}
