//! Opt-in tracing setup for hosts that feed sensor samples into the engine.
//!
//! The engine only emits `tracing` events. Installing a subscriber is left to
//! the host; these helpers cover the common case.

/// Filter applied when `RUST_LOG` is unset.
pub const DEFAULT_TRACE_FILTER: &str = "info";

/// Installs a compact `fmt` subscriber honouring `RUST_LOG`, falling back to
/// [`DEFAULT_TRACE_FILTER`].
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_fallback(DEFAULT_TRACE_FILTER)
}

/// Same as [`init_default_tracing`] with a caller-chosen fallback directive,
/// e.g. `"sensor_plot=trace"` to watch every ingested point.
#[must_use]
pub fn init_tracing_with_fallback(fallback_directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_directive));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_directive;
        false
    }
}
