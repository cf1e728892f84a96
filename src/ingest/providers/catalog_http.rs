use std::time::Duration;

use async_trait::async_trait;
use metrics::histogram;

use crate::error::DashboardError;
use crate::ingest::parse_payload;
use crate::ingest::types::{CatalogQuery, LoadReport, SalesSource};

/// Remote product catalog reached over plain HTTP GET.
pub struct CatalogHttpSource {
    endpoint: String,
    client: reqwest::Client,
}

impl CatalogHttpSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, DashboardError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SalesSource for CatalogHttpSource {
    async fn fetch(&self, query: &CatalogQuery) -> Result<LoadReport, DashboardError> {
        let t0 = std::time::Instant::now();
        let resp = self
            .client
            .get(&self.endpoint)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        let body = resp.text().await?;
        histogram!("dashboard_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        parse_payload(&body)
    }

    fn name(&self) -> &'static str {
        "catalog"
    }
}
