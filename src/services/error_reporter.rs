//! Error reporting collaborator for background task failures

use tracing::error;

use crate::error::TimerError;

/// Receives failures from background tasks that have no caller to return to.
/// Injected at construction so tests can observe what was reported.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &TimerError);
}

/// Reporter that writes failures to the tracing log
#[derive(Debug, Default, Clone)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, error: &TimerError) {
        error!("Background task failed: {}", error);
    }
}
