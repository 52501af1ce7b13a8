#![forbid(unsafe_code)]

//! Logging facade and diagnostic toggles.
//!
//! With the `tracing` feature, the `tracing` level macros are re-exported
//! here (and at the crate root). With `tracing-json`, [`init`] installs a
//! `tracing-subscriber` formatter filtered by `TENFOOT_LOG`, falling back to
//! `RUST_LOG`.
//!
//! Handler diagnostics are additionally gated by a per-handler debug flag;
//! [`debug_from_env`] reads its default from `TENFOOT_DEBUG`.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Environment variable holding the default handler debug flag.
pub const DEBUG_ENV: &str = "TENFOOT_DEBUG";

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "TENFOOT_LOG";

#[inline]
fn env_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Debug flag default using a custom environment lookup.
///
/// An unset variable means debug diagnostics are on, matching handlers
/// constructed without an explicit flag.
#[inline]
pub fn debug_from_env_with<F>(get_env: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    get_env(DEBUG_ENV).is_none_or(|value| env_flag(&value))
}

/// Debug flag default read from the process environment.
#[inline]
pub fn debug_from_env() -> bool {
    debug_from_env_with(|key| std::env::var(key).ok())
}

/// Install a global `tracing` subscriber.
///
/// Uses the `TENFOOT_LOG` filter when set, `RUST_LOG` otherwise. Emits JSON
/// lines when `json` is true.
///
/// # Errors
///
/// Fails if a global subscriber is already installed or the filter does not
/// parse.
#[cfg(feature = "tracing-json")]
pub fn init(json: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::EnvFilter;

    let filter = match std::env::var(LOG_ENV) {
        Ok(directive) => EnvFilter::try_new(directive)?,
        Err(_) => EnvFilter::from_default_env(),
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
}
