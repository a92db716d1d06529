//! Tracing installation for hosts and tests.
//!
//! The engine only emits `tracing` events and spans; nothing is printed
//! unless a subscriber is installed. [`install_tracing`] installs a console
//! subscriber filtered by `RUST_LOG` (default `info`). Use
//! `RUST_LOG=trellis=trace` to see every cache hit and miss.

use std::panic::{self, PanicHookInfo};
use std::sync::Once;

use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "info";

// ============================================================================
// Global State
// ============================================================================

static TRACING_INSTALLED: Once = Once::new();
static PANIC_HOOK_INSTALLED: Once = Once::new();

// ============================================================================
// Installation
// ============================================================================

/// Install the console subscriber (idempotent).
///
/// Does nothing if another global subscriber is already set.
pub fn install_tracing() {
    TRACING_INSTALLED.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let console = fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_filter(filter);

        if tracing_subscriber::registry().with(console).try_init().is_err() {
            tracing::debug!("a global tracing subscriber was already installed");
        }
    });
}

/// Log panics through `tracing` before the previous hook runs (idempotent).
///
/// Layout contract violations surface as panics; this puts them in the same
/// stream as the spans that led to them.
pub fn install_panic_logger() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            log_panic(info);
            previous(info);
        }));
    });
}

fn log_panic(info: &PanicHookInfo<'_>) {
    let location = info
        .location()
        .map(|location| format!("{}:{}", location.file(), location.line()));
    tracing::error!(
        target: "trellis::panic",
        message = %panic_message(info),
        location = location.as_deref().unwrap_or("unknown"),
    );
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(message) = info.payload().downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = info.payload().downcast_ref::<String>() {
        message.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installation_is_idempotent() {
        install_tracing();
        install_tracing();
        install_panic_logger();
        install_panic_logger();
        tracing::info!("logging installed");
    }
}
