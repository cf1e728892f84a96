// src/query.rs
//! Dashboard configuration: the explicit replacement for UI widget state.
//!
//! The UI (or any HTTP caller) sends raw strings; `DashboardQuery::from_params`
//! validates them once so the pipeline only ever sees in-range values.

use serde::{Deserialize, Serialize};

use crate::aggregate::Metric;
use crate::error::DashboardError;
use crate::ingest::types::CatalogQuery;
use crate::leaderboard::TopN;

pub const MIN_YEAR: i32 = 2020;
pub const MAX_YEAR: i32 = 2023;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Region {
    /// Whole country, no regional filter.
    #[default]
    Brasil,
    #[serde(rename = "Centro-Oeste")]
    CentroOeste,
    Nordeste,
    Norte,
    Sudeste,
    Sul,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Brasil,
        Region::CentroOeste,
        Region::Nordeste,
        Region::Norte,
        Region::Sudeste,
        Region::Sul,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Region::Brasil => "Brasil",
            Region::CentroOeste => "Centro-Oeste",
            Region::Nordeste => "Nordeste",
            Region::Norte => "Norte",
            Region::Sudeste => "Sudeste",
            Region::Sul => "Sul",
        }
    }

    /// Value for the catalog's `regiao` parameter; empty means all regions.
    pub fn wire_value(self) -> String {
        match self {
            Region::Brasil => String::new(),
            other => other.label().to_lowercase(),
        }
    }
}

impl std::str::FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.is_empty() {
            return Ok(Region::Brasil);
        }
        Region::ALL
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(t))
            .ok_or_else(|| format!("unknown region '{t}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum YearFilter {
    #[default]
    AllTime,
    Year(i32),
}

impl YearFilter {
    pub fn year(y: i32) -> Result<Self, String> {
        if (MIN_YEAR..=MAX_YEAR).contains(&y) {
            Ok(YearFilter::Year(y))
        } else {
            Err(format!("year {y} outside {MIN_YEAR}..={MAX_YEAR}"))
        }
    }

    /// Value for the catalog's `ano` parameter; empty means all years.
    pub fn wire_value(self) -> String {
        match self {
            YearFilter::AllTime => String::new(),
            YearFilter::Year(y) => y.to_string(),
        }
    }
}

/// Query-string shape accepted by the API. Everything optional.
///
/// Sellers arrive two ways and are merged: `seller=` may repeat and each value
/// is one whole name (so `Silva, Ana` survives), while `sellers=` is a
/// comma-separated shorthand.
#[derive(Debug, Clone, Default)]
pub struct DashboardParams {
    pub region: Option<String>,
    pub year: Option<String>,
    pub sellers: Vec<String>,
    pub top_n: Option<String>,
    pub metric: Option<String>,
}

impl DashboardParams {
    /// Build from decoded query pairs; unknown keys are ignored and the last
    /// value wins for scalar keys.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut p = Self::default();
        for (k, v) in pairs {
            match k.as_str() {
                "region" => p.region = Some(v),
                "year" => p.year = Some(v),
                "seller" => p.sellers.push(v),
                "sellers" => p.sellers.extend(v.split(',').map(str::to_string)),
                "top_n" => p.top_n = Some(v),
                "metric" => p.metric = Some(v),
                _ => {}
            }
        }
        p
    }
}

/// Validated filters for one recomputation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardQuery {
    pub region: Region,
    pub year: YearFilter,
    pub sellers: Vec<String>,
    pub top_n: TopN,
    /// When set, the seller tab shows only this leaderboard.
    pub metric: Option<Metric>,
}

impl Default for DashboardQuery {
    fn default() -> Self {
        Self {
            region: Region::Brasil,
            year: YearFilter::AllTime,
            sellers: Vec::new(),
            top_n: TopN::DEFAULT,
            metric: None,
        }
    }
}

impl DashboardQuery {
    pub fn from_params(p: &DashboardParams, default_top_n: TopN) -> Result<Self, DashboardError> {
        let invalid = DashboardError::InvalidQuery;

        let region = p
            .region
            .as_deref()
            .unwrap_or_default()
            .parse::<Region>()
            .map_err(invalid)?;

        let year = match p.year.as_deref().map(str::trim) {
            None | Some("") | Some("all") => YearFilter::AllTime,
            Some(raw) => {
                let y: i32 = raw
                    .parse()
                    .map_err(|_| invalid(format!("year '{raw}' is not a number")))?;
                YearFilter::year(y).map_err(invalid)?
            }
        };

        let mut sellers: Vec<String> = Vec::with_capacity(p.sellers.len());
        for name in p.sellers.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            if !sellers.iter().any(|s| s == name) {
                sellers.push(name.to_string());
            }
        }

        let top_n = match p.top_n.as_deref().map(str::trim) {
            None | Some("") => default_top_n,
            Some(raw) => {
                let n: usize = raw
                    .parse()
                    .map_err(|_| invalid(format!("top_n '{raw}' is not a number")))?;
                TopN::new(n).map_err(invalid)?
            }
        };

        let metric = match p.metric.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<Metric>().map_err(invalid)?),
        };

        Ok(Self {
            region,
            year,
            sellers,
            top_n,
            metric,
        })
    }

    pub fn catalog_query(&self) -> CatalogQuery {
        CatalogQuery {
            regiao: self.region.wire_value(),
            ano: self.year.wire_value(),
        }
    }
}
