//! # Dashboard
//! One full recomputation: fetch → seller filter → aggregation → charts.
//!
//! `assemble` is the pure half (no I/O) and is what tests exercise directly;
//! `build` adds the catalog fetch and telemetry around it.

use metrics::{gauge, histogram};
use serde::Serialize;
use tracing::info;

use crate::aggregate::{Metric, Summaries, Totals};
use crate::charts::{self, ChartSpec};
use crate::error::DashboardError;
use crate::filter;
use crate::format::format_number;
use crate::ingest::{
    self,
    types::{LoadReport, RejectedRow, SalesSource},
};
use crate::leaderboard::top_sellers;
use crate::query::DashboardQuery;

/// Rejection reasons echoed back to the UI.
const REJECTED_SAMPLE: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tab {
    pub title: &'static str,
    pub cards: Vec<MetricCard>,
    pub charts: Vec<ChartSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedSummary {
    pub count: usize,
    pub sample: Vec<RejectedRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub query: DashboardQuery,
    pub totals: Totals,
    pub tabs: Vec<Tab>,
    /// Sellers present in the unfiltered fetch, for the multi-select.
    pub sellers_available: Vec<String>,
    pub rejected_rows: RejectedSummary,
}

/// Fetch from `source` and assemble the dashboard for `query`.
pub async fn build(
    source: &dyn SalesSource,
    query: &DashboardQuery,
) -> Result<DashboardView, DashboardError> {
    let t0 = std::time::Instant::now();
    let report = ingest::load(source, &query.catalog_query()).await?;
    let view = assemble(&report, query);

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("dashboard_build_ms").record(ms);
    gauge!("dashboard_last_build_ts").set(chrono::Utc::now().timestamp() as f64);
    info!(
        region = query.region.label(),
        year = %query.year.wire_value(),
        sellers = query.sellers.len(),
        rows = report.records.len(),
        rejected = report.rejected.len(),
        elapsed_ms = ms,
        "dashboard built"
    );
    Ok(view)
}

/// Pure assembly from an already loaded dataset.
pub fn assemble(report: &LoadReport, query: &DashboardQuery) -> DashboardView {
    let filtered = filter::by_sellers(&report.records, &query.sellers);
    let s = Summaries::compute(&filtered);
    let cards = metric_cards(&s.totals);

    let tabs = vec![
        Tab {
            title: "Receita",
            cards: cards.clone(),
            charts: vec![
                charts::location_map("Receita por estado", &s.revenue_by_location),
                charts::monthly_line("Receita mensal", "Receita", &s.revenue_by_month),
                charts::top_locations_bar(
                    "Top estados (receita)",
                    "Receita",
                    &s.revenue_by_location,
                ),
                charts::category_bar(
                    "Receita por categoria",
                    "Receita",
                    &s.revenue_by_category,
                    true,
                ),
            ],
        },
        Tab {
            title: "Quantidade de vendas",
            cards: cards.clone(),
            charts: vec![
                charts::location_map("Vendas por estado", &s.count_by_location),
                charts::monthly_line(
                    "Quantidade de vendas mensal",
                    "Quantidade de vendas",
                    &s.count_by_month,
                ),
                charts::top_locations_bar(
                    "Top 5 estados",
                    "Quantidade de vendas",
                    &s.count_by_location,
                ),
                charts::category_bar(
                    "Vendas por categoria",
                    "Quantidade de vendas",
                    &s.count_by_category,
                    false,
                ),
            ],
        },
        Tab {
            title: "Vendedores",
            cards,
            charts: seller_charts(&s, query),
        },
    ];

    DashboardView {
        query: query.clone(),
        totals: s.totals,
        tabs,
        sellers_available: filter::distinct_sellers(&report.records),
        rejected_rows: RejectedSummary {
            count: report.rejected.len(),
            sample: report.rejected.iter().take(REJECTED_SAMPLE).cloned().collect(),
        },
    }
}

fn metric_cards(t: &Totals) -> Vec<MetricCard> {
    vec![
        MetricCard {
            label: "Receita",
            value: format_number(t.revenue, "R$"),
        },
        MetricCard {
            label: "Quantidade total de vendas",
            value: format_number(t.count as f64, ""),
        },
    ]
}

fn seller_charts(s: &Summaries, query: &DashboardQuery) -> Vec<ChartSpec> {
    let n = query.top_n;
    let metrics: &[Metric] = match query.metric {
        Some(Metric::Sum) => &[Metric::Sum],
        Some(Metric::Count) => &[Metric::Count],
        None => &[Metric::Sum, Metric::Count],
    };
    metrics
        .iter()
        .map(|&m| {
            let suffix = match m {
                Metric::Sum => "receita",
                Metric::Count => "vendas",
            };
            let title = format!("Top {} vendedores ({suffix})", n.get());
            charts::seller_bar(&title, &top_sellers(&s.sellers, m, n), m)
        })
        .collect()
}
