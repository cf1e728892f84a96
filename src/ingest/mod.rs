// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::error::DashboardError;
use crate::ingest::types::{
    CatalogQuery, LoadReport, RejectedRow, SalesRecord, SalesSource, WireRecord,
};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, histogram};
use once_cell::sync::OnceCell;

/// How many rejection reasons are kept verbatim in logs.
const REJECT_LOG_SAMPLE: usize = 5;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("dashboard_fetch_total", "Catalog fetches attempted.");
        describe_counter!(
            "dashboard_fetch_errors_total",
            "Catalog fetches that failed (transport or payload)."
        );
        describe_counter!(
            "dashboard_rows_total",
            "Rows accepted from the catalog payload."
        );
        describe_counter!(
            "dashboard_rows_rejected_total",
            "Rows excluded because they were malformed."
        );
        describe_histogram!("dashboard_parse_ms", "Payload parse time in milliseconds.");
        describe_histogram!("dashboard_fetch_ms", "Catalog round-trip time in milliseconds.");
        describe_histogram!("dashboard_build_ms", "Full dashboard recomputation time in milliseconds.");
        describe_gauge!(
            "dashboard_last_build_ts",
            "Unix ts when a dashboard was last built."
        );
    });
}

/// Parse a catalog body into typed records.
///
/// A body that is not a JSON array fails as a whole; individual rows that
/// do not convert are excluded and reported in `LoadReport::rejected`.
pub fn parse_payload(body: &str) -> Result<LoadReport, DashboardError> {
    let t0 = std::time::Instant::now();
    let rows: Vec<serde_json::Value> = serde_json::from_str(body)
        .map_err(|e| DashboardError::Payload(format!("expected a JSON array of rows: {e}")))?;

    let mut report = LoadReport {
        records: Vec::with_capacity(rows.len()),
        rejected: Vec::new(),
    };
    for (index, row) in rows.into_iter().enumerate() {
        let parsed = serde_json::from_value::<WireRecord>(row)
            .map_err(|e| e.to_string())
            .and_then(SalesRecord::try_from);
        match parsed {
            Ok(rec) => report.records.push(rec),
            Err(reason) => report.rejected.push(RejectedRow { index, reason }),
        }
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("dashboard_parse_ms").record(ms);
    Ok(report)
}

/// Fetch once from `source`, recording telemetry and logging exclusions.
pub async fn load(
    source: &dyn SalesSource,
    query: &CatalogQuery,
) -> Result<LoadReport, DashboardError> {
    ensure_metrics_described();
    counter!("dashboard_fetch_total").increment(1);

    let report = match source.fetch(query).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(
                error = %e,
                provider = source.name(),
                regiao = %query.regiao,
                ano = %query.ano,
                "catalog fetch failed"
            );
            counter!("dashboard_fetch_errors_total").increment(1);
            return Err(e);
        }
    };

    counter!("dashboard_rows_total").increment(report.records.len() as u64);
    if !report.rejected.is_empty() {
        counter!("dashboard_rows_rejected_total").increment(report.rejected.len() as u64);
        let sample: Vec<&RejectedRow> = report.rejected.iter().take(REJECT_LOG_SAMPLE).collect();
        tracing::warn!(
            provider = source.name(),
            rejected = report.rejected.len(),
            sample = ?sample,
            "catalog rows excluded"
        );
    }
    tracing::debug!(provider = source.name(), rows = report.records.len(), "catalog loaded");

    Ok(report)
}
