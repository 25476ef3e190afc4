//! Logger capability for non-fatal translation warnings.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::warn;

/// Sink for translation warnings.
///
/// Called concurrently from every in-flight request, so implementations
/// must be `Send + Sync` and must never panic.
pub trait Logger: Send + Sync + 'static {
    /// Record a warning with structured key/value fields.
    fn warn(&self, message: &str, fields: &[(&str, &str)]);
}

/// Shared logger handle as stored in configuration.
pub type SharedLogger = Arc<dyn Logger>;

impl<F> Logger for F
where
    F: Fn(&str, &[(&str, &str)]) + Send + Sync + 'static,
{
    fn warn(&self, message: &str, fields: &[(&str, &str)]) {
        self(message, fields)
    }
}

/// Default logger: forwards warnings to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn warn(&self, message: &str, fields: &[(&str, &str)]) {
        if fields.is_empty() {
            warn!("{}", message);
        } else {
            warn!(fields = %format_fields(fields), "{}", message);
        }
    }
}

/// Render fields as `key=value` pairs separated by spaces.
pub fn format_fields(fields: &[(&str, &str)]) -> String {
    let mut out = String::new();
    for (i, (key, value)) in fields.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{}={}", key, value);
    }
    out
}
