use tracing_subscriber::EnvFilter;

/// Set to `json` for one JSON object per log line.
pub const LOG_FORMAT_VAR: &str = "HOOKS_LOG_FORMAT";

/// Installs the global subscriber. Filtering follows `RUST_LOG` and defaults
/// to `info`. Timestamps are left off because CloudWatch stamps every line.
/// Calling this more than once is harmless.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_VAR).is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time();

    if json {
        builder.json().try_init().ok();
    } else {
        builder.try_init().ok();
    }
}
