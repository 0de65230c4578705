/*!
 * Logging
 * tracing subscriber setup for the simulator binary
 */

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable that switches log output to JSON lines.
pub const LOG_JSON_ENV: &str = "CPU_SCHED_LOG_JSON";

/// Install the global subscriber.
///
/// Environment variables:
/// - RUST_LOG: log filter (default: warn)
/// - CPU_SCHED_LOG_JSON: `1` or `true` for JSON output
///
/// Logs go to stderr so they never mix with the report on stdout. The
/// interactive replay shares the terminal with stderr, so redirect it
/// (`2>sched.log`) when running the replay with `RUST_LOG` at trace.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let use_json = std::env::var(LOG_JSON_ENV)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    // Ignore an already installed subscriber
    let _ = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
}
