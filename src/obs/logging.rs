// crates.io
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Selects the `tracing` output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_FILTER: &str = "info,tower_http=debug";

/// Installs the global subscriber.
///
/// `RUST_LOG` controls filtering (default `info,tower_http=debug`); `LOG_FORMAT=json`
/// switches from human-readable lines to flattened JSON events. Calling this twice is
/// harmless: the second installation is ignored.
pub fn init_logging() {
	let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|value| value.eq_ignore_ascii_case("json"));
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
	let registry = tracing_subscriber::registry().with(filter);
	let installed = if json {
		registry.with(fmt::layer().json().flatten_event(true).with_current_span(true)).try_init()
	} else {
		registry.with(fmt::layer().with_target(true)).try_init()
	};

	if installed.is_err() {
		tracing::debug!("Global subscriber already installed.");
	}
}
