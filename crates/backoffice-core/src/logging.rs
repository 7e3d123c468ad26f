//! Logging integration.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`SiteSettings`](crate::settings::SiteSettings) and for creating
//! per-request spans.

use crate::settings::SiteSettings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The log level is read from `settings.log_level` (e.g. "debug", "info",
/// "warn", "error"). In debug mode a pretty, human-readable format is used;
/// in production a structured JSON format is used.
///
/// Installing a subscriber when one is already set is a no-op, so this is
/// safe to call from tests.
pub fn setup_logging(settings: &SiteSettings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for an admin API request.
///
/// Attach this span to the request processing pipeline so that log entries
/// emitted during dispatch carry the resolved endpoint and action.
///
/// # Examples
///
/// ```
/// use backoffice_core::logging::dispatch_span;
///
/// let span = dispatch_span("fruit.apple", "list");
/// let _guard = span.enter();
/// tracing::info!("dispatching");
/// ```
pub fn dispatch_span(basename: &str, action: &str) -> tracing::Span {
    tracing::info_span!("dispatch", basename = basename, action = action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_is_idempotent() {
        let settings = SiteSettings::default();
        setup_logging(&settings);
        setup_logging(&settings);
    }

    #[test]
    fn test_dispatch_span_has_name() {
        let span = dispatch_span("fruit.apple", "list");
        assert_eq!(span.metadata().map(|m| m.name()), Some("dispatch"));
    }
}
