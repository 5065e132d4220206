//! Tracing bootstrap.
//!
//! Library code only emits `tracing` events; binaries and tests call
//! [`init_tracing`] once to print them. `RUST_LOG` overrides the default
//! filter.

use duoadmin_domain::{AdminError, Result};
use once_cell::sync::OnceCell;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Output format for [`init_tracing_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Install a human-readable subscriber filtered by `RUST_LOG` or `default_filter`.
///
/// Calling it again is a no-op.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    init_tracing_with(default_filter, LogFormat::Pretty)
}

pub fn init_tracing_with(default_filter: &str, format: LogFormat) -> Result<()> {
    INITIALIZED
        .get_or_try_init(|| {
            let filter = build_filter(default_filter)?;
            let registry = tracing_subscriber::registry().with(filter);
            let installed = match format {
                LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init(),
                LogFormat::Json => registry.with(fmt::layer().json().with_target(true)).try_init(),
            };

            // Another subscriber may already own the global slot; keep it.
            if let Err(err) = installed {
                tracing::debug!(error = %err, "global subscriber already installed");
            }
            Ok(())
        })
        .map(|_| ())
}

fn build_filter(default_filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(default_filter)
            .map_err(|e| AdminError::Config(format!("invalid log filter '{default_filter}': {e}")))
    })
}
