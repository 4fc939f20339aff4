//! Tracing setup for hosts embedding the client core
//!
//! Console only: colored, compact. `RUST_LOG` takes precedence over the
//! default filter.

use anyhow::Context as _;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directive applied on top of `info` when `RUST_LOG` is not set
pub const DEFAULT_DIRECTIVE: &str = "gymbook_core=debug";

/// Build the filter used by [`init_tracing`]
pub fn env_filter(default_directive: &str) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => {
            let directive = default_directive
                .parse()
                .with_context(|| format!("Invalid log directive '{}'", default_directive))?;
            Ok(EnvFilter::new("info").add_directive(directive))
        }
    }
}

/// Install the global subscriber
///
/// Loads `.env` first so `RUST_LOG` can come from there during development.
/// Returns an error if a subscriber is already installed.
pub fn init_tracing(default_directive: &str) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let console_layer = fmt::layer()
        .with_ansi(true)
        .compact()
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter(default_directive)?)
        .with(console_layer)
        .try_init()
        .context("Tracing subscriber already installed")?;

    Ok(())
}
