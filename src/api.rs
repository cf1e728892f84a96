use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::aggregate::{self, Metric, SellerSummary};
use crate::config::AppConfig;
use crate::dashboard::{self, DashboardView};
use crate::error::DashboardError;
use crate::filter;
use crate::ingest::{self, types::SalesSource};
use crate::leaderboard::{top_sellers, TopN};
use crate::metrics::Metrics;
use crate::query::{DashboardParams, DashboardQuery, Region};

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn SalesSource>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(source: Arc<dyn SalesSource>, config: AppConfig) -> Self {
        Self {
            source,
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config.static_dir);

    let mut app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/regions", get(regions))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/sellers", get(get_sellers))
        .route("/api/leaderboard", get(get_leaderboard));

    match Metrics::init() {
        Ok(m) => app = app.merge(m.router::<AppState>()),
        Err(e) => tracing::warn!(error = %e, "metrics disabled"),
    }

    app.fallback_service(static_dir)
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Pairs rather than a struct so `seller=` can repeat.
type Pairs = Query<Vec<(String, String)>>;

fn parse_query(
    state: &AppState,
    pairs: Vec<(String, String)>,
) -> Result<DashboardQuery, DashboardError> {
    let p = DashboardParams::from_pairs(pairs);
    DashboardQuery::from_params(&p, state.config.default_top_n)
}

#[derive(Serialize)]
struct RegionOut {
    label: &'static str,
    value: String,
}

async fn regions() -> Json<Vec<RegionOut>> {
    Json(
        Region::ALL
            .into_iter()
            .map(|r| RegionOut {
                label: r.label(),
                value: r.wire_value(),
            })
            .collect(),
    )
}

async fn get_dashboard(
    State(state): State<AppState>,
    Query(pairs): Pairs,
) -> Result<Json<DashboardView>, DashboardError> {
    let q = parse_query(&state, pairs)?;
    let view = dashboard::build(state.source.as_ref(), &q).await?;
    Ok(Json(view))
}

async fn get_sellers(
    State(state): State<AppState>,
    Query(pairs): Pairs,
) -> Result<Json<Vec<String>>, DashboardError> {
    let q = parse_query(&state, pairs)?;
    let report = ingest::load(state.source.as_ref(), &q.catalog_query()).await?;
    Ok(Json(filter::distinct_sellers(&report.records)))
}

#[derive(Serialize)]
struct LeaderboardOut {
    metric: Metric,
    top_n: TopN,
    rows: Vec<SellerSummary>,
}

async fn get_leaderboard(
    State(state): State<AppState>,
    Query(pairs): Pairs,
) -> Result<Json<LeaderboardOut>, DashboardError> {
    let q = parse_query(&state, pairs)?;
    let metric = q.metric.unwrap_or(Metric::Sum);
    let report = ingest::load(state.source.as_ref(), &q.catalog_query()).await?;
    let filtered = filter::by_sellers(&report.records, &q.sellers);
    let rows = top_sellers(&aggregate::by_seller(&filtered), metric, q.top_n);
    Ok(Json(LeaderboardOut {
        metric,
        top_n: q.top_n,
        rows,
    }))
}
