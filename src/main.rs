//! Sales Dashboard — Binary Entrypoint
//! Boots the Axum HTTP server with the catalog-backed dashboard API.

use sales_dashboard::config::AppConfig;
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Used when `RUST_LOG` is unset: the crate's own fetch/reject/build events at
/// `info`, dependencies (reqwest, hyper, tower-http) only at `warn`.
const DEFAULT_LOG_FILTER: &str = "sales_dashboard=info,warn";

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - DASHBOARD_DEV_LOG=1
///
/// Rejected catalog rows and failed fetches are logged at `warn`, so they show up
/// under the default filter; set `RUST_LOG=sales_dashboard=debug` to also see
/// per-fetch row counts and coordinate conflicts.
fn enable_dev_tracing() {
    let dev_flag = std::env::var("DASHBOARD_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // Shuttle may already have installed a subscriber; keep theirs in that case.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let config = AppConfig::load_default()?;
    let router = sales_dashboard::app(config)?;

    Ok(router.into())
}
