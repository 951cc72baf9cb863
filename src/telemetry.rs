//! Telemetry initialization (tracing/tracing-subscriber).
//!
//! - LOG_LEVEL controls the filter (e.g. "debug" or full directives).
//! - LOG_FORMAT selects "pretty" (default) or "json" structured logs.
//!
//! Targets in use: "studygame" (server lifecycle), "games" (sessions and
//! generation) and "answers" (one line per recorded answer). Tower HTTP's
//! TraceLayer adds per-request spans on top.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,games=debug,answers=info,studygame=debug,tower_http=info,axum=info";

fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_tracing() {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_from_env())
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // json() changes the builder type, so each arm inits on its own.
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}
