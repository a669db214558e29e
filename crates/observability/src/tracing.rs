//! Tracing/logging initialization.
//!
//! JSON lines to stdout, filtered by `RUST_LOG` (default `info`). Span close
//! events are emitted so fields recorded late (the resolved role) reach the
//! log.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

pub const DEFAULT_DIRECTIVE: &str = "info";

/// Initialize tracing/logging for the process.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init() -> bool {
    init_with_default(DEFAULT_DIRECTIVE)
}

/// Like [`init`], with `directive` used when `RUST_LOG` is unset or invalid.
pub fn init_with_default(directive: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(directive))
        .json()
        .with_current_span(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init()
        .is_ok()
}

fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_first_init_installs_a_subscriber() {
        assert!(init_with_default("debug"));
        assert!(!init());
        assert!(!init_with_default("warn"));
    }
}
