use std::io;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,tower_http=info,sea_orm=warn,sqlx=warn";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter;
/// `json` selects structured output for log shippers.
pub fn init(json: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stdout);

    // a second init (tests, embedding) keeps the first subscriber
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}
