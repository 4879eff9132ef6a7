//! Telemetry utilities for dispatch timing.

use std::time::Instant;
use tracing::trace;

/// Guard for timing one console dispatch.
///
/// Logs the elapsed time when dropped.
pub struct DispatchTimer {
    verb: String,
    start: Instant,
}

impl DispatchTimer {
    /// Start timing a dispatch.
    pub fn new(verb: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for DispatchTimer {
    fn drop(&mut self) {
        let micros = self.start.elapsed().as_micros();
        trace!(verb = %self.verb, elapsed_us = micros as u64, "Dispatch finished");
    }
}

/// Standardized span constructors for console observability.
pub mod spans {
    use tracing::{Span, info_span};

    /// Create a span for one dispatched console line.
    pub fn dispatch(scope: &str, principal: &str, reply_to: &str) -> Span {
        info_span!("dispatch", scope = %scope, principal = %principal, reply_to = %reply_to)
    }

    /// Create a span for the stdin console session.
    pub fn session(user: &str, network: Option<&str>) -> Span {
        if let Some(network) = network {
            info_span!("session", user = %user, network = %network)
        } else {
            info_span!("session", user = %user)
        }
    }
}
