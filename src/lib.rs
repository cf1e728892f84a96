// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod aggregate;
pub mod api;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod format;
pub mod ingest;
pub mod leaderboard;
pub mod metrics;
pub mod query;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::error::DashboardError;
pub use crate::ingest::types::{SalesRecord, SalesSource};

use std::sync::Arc;

use crate::config::AppConfig;
use crate::ingest::providers::CatalogHttpSource;

/// Build the full application router from resolved configuration, using the
/// remote catalog as the data source.
pub fn app(config: AppConfig) -> anyhow::Result<axum::Router> {
    let source = CatalogHttpSource::new(config.endpoint.clone(), config.http_timeout())?;
    tracing::info!(
        endpoint = source.endpoint(),
        timeout_secs = config.http_timeout_secs,
        "catalog source ready"
    );
    Ok(router(AppState::new(Arc::new(source), config)))
}
