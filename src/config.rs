use tracing_subscriber::EnvFilter;

/// Engine-level constants
pub const ENGINE_NAME: &str = "plc-report-lens";
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default `tracing` filter when `RUST_LOG` is not set.
/// Debug builds log the per-stage decisions (chosen field, strategy, counters).
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "plc_report_lens=debug"
    } else {
        "plc_report_lens=info"
    }
}

/// Install a `fmt` subscriber for hosts that do not bring their own.
///
/// Uses `try_init`, so calling it when a global subscriber already exists
/// is a no-op rather than a panic.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter()));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
    {
        tracing::info!("{} v{} tracing initialized", ENGINE_NAME, ENGINE_VERSION);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_name_is_stable() {
        assert_eq!(ENGINE_NAME, "plc-report-lens");
    }

    #[test]
    fn engine_version_matches_cargo() {
        assert_eq!(ENGINE_VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn default_filter_targets_this_crate() {
        assert!(default_log_filter().starts_with("plc_report_lens="));
    }

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }
}
