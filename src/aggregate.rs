//! # Aggregation pipeline
//! Pure derivations from a (filtered) slice of sales into the summary tables
//! the dashboard charts are bound to.
//!
//! Every table is rebuilt from scratch on each call; nothing here keeps state.
//! Empty input yields empty tables, never missing ones.
//!
//! Ordering rules:
//! - location / category tables: descending by value, stable on ties
//!   (locations keep first-appearance order, categories keep name order);
//! - monthly tables: chronological, with empty months inside the covered
//!   range emitted as zero so line charts stay continuous;
//! - seller table: seller-name order, unsorted by value (see `leaderboard`).

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::ingest::types::SalesRecord;

/// Which reduction a table uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Sum of `price` (revenue).
    Sum,
    /// Number of sales.
    Count,
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" | "revenue" => Ok(Metric::Sum),
            "count" | "volume" => Ok(Metric::Count),
            other => Err(format!("unknown metric '{other}' (expected sum|count)")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Acc {
    sum: f64,
    count: u64,
}

impl Acc {
    fn add(&mut self, price: f64) {
        self.sum += price;
        self.count += 1;
    }

    fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Sum => self.sum,
            Metric::Count => self.count as f64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSummary {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    /// First day of the bucketed month.
    pub month_start: NaiveDate,
    pub year: i32,
    /// English month name ("January"), used as the x axis.
    pub month: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellerSummary {
    pub seller: String,
    pub sum: f64,
    pub count: u64,
}

impl SellerSummary {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Sum => self.sum,
            Metric::Count => self.count as f64,
        }
    }
}

/// Totals shown on the metric cards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Totals {
    pub revenue: f64,
    pub count: u64,
}

pub fn totals(records: &[SalesRecord]) -> Totals {
    let mut acc = Acc::default();
    for r in records {
        acc.add(r.price);
    }
    Totals {
        revenue: acc.sum,
        count: acc.count,
    }
}

/// Group by selling state and attach that state's coordinates.
///
/// Coordinates come from the first record seen for each state; later records
/// that disagree are counted and logged but do not change the join.
pub fn by_location(records: &[SalesRecord], metric: Metric) -> Vec<LocationSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&SalesRecord, Acc)> = Vec::new();
    let mut conflicts = 0usize;

    for r in records {
        match index.get(r.location.as_str()) {
            Some(&i) => {
                let (first, acc) = &mut groups[i];
                if first.latitude != r.latitude || first.longitude != r.longitude {
                    conflicts += 1;
                }
                acc.add(r.price);
            }
            None => {
                index.insert(r.location.as_str(), groups.len());
                let mut acc = Acc::default();
                acc.add(r.price);
                groups.push((r, acc));
            }
        }
    }

    if conflicts > 0 {
        tracing::debug!(conflicts, "location rows with inconsistent coordinates; first seen kept");
    }

    let mut rows: Vec<LocationSummary> = groups
        .into_iter()
        .map(|(first, acc)| LocationSummary {
            location: first.location.clone(),
            latitude: first.latitude,
            longitude: first.longitude,
            value: acc.value(metric),
        })
        .collect();
    sort_desc(&mut rows, |r| r.value);
    rows
}

/// Bucket by calendar month, oldest first.
pub fn by_month(records: &[SalesRecord], metric: Metric) -> Vec<MonthlySummary> {
    let mut buckets: BTreeMap<NaiveDate, Acc> = BTreeMap::new();
    for r in records {
        buckets
            .entry(month_start(r.purchase_date))
            .or_default()
            .add(r.price);
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut cursor = first;
    while cursor <= last {
        let value = buckets
            .get(&cursor)
            .map(|a| a.value(metric))
            .unwrap_or(0.0);
        out.push(MonthlySummary {
            month_start: cursor,
            year: cursor.year(),
            month: cursor.format("%B").to_string(),
            value,
        });
        cursor = match cursor.checked_add_months(Months::new(1)) {
            Some(next) => next,
            None => break,
        };
    }
    out
}

pub fn by_category(records: &[SalesRecord], metric: Metric) -> Vec<CategorySummary> {
    let mut groups: BTreeMap<&str, Acc> = BTreeMap::new();
    for r in records {
        groups.entry(r.category.as_str()).or_default().add(r.price);
    }
    let mut rows: Vec<CategorySummary> = groups
        .into_iter()
        .map(|(category, acc)| CategorySummary {
            category: category.to_string(),
            value: acc.value(metric),
        })
        .collect();
    sort_desc(&mut rows, |r| r.value);
    rows
}

/// Revenue and count per seller in one pass, seller-name order.
pub fn by_seller(records: &[SalesRecord]) -> Vec<SellerSummary> {
    let mut groups: BTreeMap<&str, Acc> = BTreeMap::new();
    for r in records {
        groups.entry(r.seller.as_str()).or_default().add(r.price);
    }
    groups
        .into_iter()
        .map(|(seller, acc)| SellerSummary {
            seller: seller.to_string(),
            sum: acc.sum,
            count: acc.count,
        })
        .collect()
}

/// All seven tables plus totals for one recomputation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summaries {
    pub totals: Totals,
    pub revenue_by_location: Vec<LocationSummary>,
    pub revenue_by_month: Vec<MonthlySummary>,
    pub revenue_by_category: Vec<CategorySummary>,
    pub count_by_location: Vec<LocationSummary>,
    pub count_by_month: Vec<MonthlySummary>,
    pub count_by_category: Vec<CategorySummary>,
    pub sellers: Vec<SellerSummary>,
}

impl Summaries {
    pub fn compute(records: &[SalesRecord]) -> Self {
        Self {
            totals: totals(records),
            revenue_by_location: by_location(records, Metric::Sum),
            revenue_by_month: by_month(records, Metric::Sum),
            revenue_by_category: by_category(records, Metric::Sum),
            count_by_location: by_location(records, Metric::Count),
            count_by_month: by_month(records, Metric::Count),
            count_by_category: by_category(records, Metric::Count),
            sellers: by_seller(records),
        }
    }
}

fn month_start(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}

/// Stable descending sort on an f64 key.
fn sort_desc<T>(rows: &mut [T], key: impl Fn(&T) -> f64) {
    rows.sort_by(|a, b| key(b).total_cmp(&key(a)));
}
