use async_trait::async_trait;

use crate::error::DashboardError;
use crate::ingest::parse_payload;
use crate::ingest::types::{CatalogQuery, LoadReport, SalesSource};

/// Serves a fixed catalog body, ignoring the query.
///
/// Used by tests to drive the pipeline without network access.
pub struct FixtureSource {
    body: String,
}

impl FixtureSource {
    pub fn from_json_str(s: &str) -> Self {
        Self {
            body: s.to_string(),
        }
    }
}

#[async_trait]
impl SalesSource for FixtureSource {
    async fn fetch(&self, _query: &CatalogQuery) -> Result<LoadReport, DashboardError> {
        parse_payload(&self.body)
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
