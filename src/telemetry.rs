//! Telemetry initialization.
//!
//! Controlled by `STABLECHECK_LOG`:
//! - unset → no-op (tracing disabled, zero overhead)
//! - `"stderr"` → JSON events and span closes to stderr
//! - `"pretty"` → human-readable events to stderr
//!
//! The level filter comes from `RUST_LOG` and defaults to `info`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Environment variable selecting the telemetry sink.
pub const LOG_ENV: &str = "STABLECHECK_LOG";

/// Where tracing output goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sink {
    /// No subscriber is installed.
    Off,
    /// JSON lines on stderr.
    JsonStderr,
    /// Human-readable lines on stderr.
    PrettyStderr,
}

impl Sink {
    /// Interpret a `STABLECHECK_LOG` value. Unrecognised values fall back to
    /// [`Sink::Off`] with a warning on stderr.
    #[must_use]
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            None | Some("") => Self::Off,
            Some("stderr" | "json") => Self::JsonStderr,
            Some("pretty") => Self::PrettyStderr,
            Some(other) => {
                eprintln!("warning: {LOG_ENV}={other} not recognised (use stderr or pretty)");
                Self::Off
            }
        }
    }
}

/// Initialize telemetry based on `STABLECHECK_LOG`.
///
/// Safe to call once per process; later calls are ignored.
pub fn init() {
    let value = std::env::var(LOG_ENV).ok();
    install(Sink::from_env_value(value.as_deref()));
}

fn install(sink: Sink) {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match sink {
        Sink::Off => return,
        Sink::JsonStderr => tracing_subscriber::registry()
            .with(filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE),
            )
            .try_init(),
        Sink::PrettyStderr => tracing_subscriber::registry()
            .with(filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init(),
    };
    if let Err(e) = result {
        eprintln!("warning: telemetry already initialised: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_from_env_value() {
        assert_eq!(Sink::from_env_value(None), Sink::Off);
        assert_eq!(Sink::from_env_value(Some("")), Sink::Off);
        assert_eq!(Sink::from_env_value(Some("stderr")), Sink::JsonStderr);
        assert_eq!(Sink::from_env_value(Some("json")), Sink::JsonStderr);
        assert_eq!(Sink::from_env_value(Some("pretty")), Sink::PrettyStderr);
        assert_eq!(Sink::from_env_value(Some("otlp")), Sink::Off);
    }
}
