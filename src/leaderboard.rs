//! Seller leaderboard: top-N sellers by revenue or by number of sales.

use serde::{Deserialize, Serialize};

use crate::aggregate::{Metric, SellerSummary};

/// Leaderboard size, always within `TopN::MIN..=TopN::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct TopN(usize);

impl TopN {
    pub const MIN: usize = 2;
    pub const MAX: usize = 10;
    pub const DEFAULT: TopN = TopN(5);

    pub fn new(n: usize) -> Result<Self, String> {
        if (Self::MIN..=Self::MAX).contains(&n) {
            Ok(Self(n))
        } else {
            Err(format!(
                "top_n must be within {}..={}, got {n}",
                Self::MIN,
                Self::MAX
            ))
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for TopN {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for TopN {
    type Error = String;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        TopN::new(n)
    }
}

impl From<TopN> for usize {
    fn from(n: TopN) -> Self {
        n.0
    }
}

/// The `n` best sellers by `metric`, highest first.
///
/// Ties keep the table's own order. With fewer than `n` sellers, all of them
/// are returned.
pub fn top_sellers(table: &[SellerSummary], metric: Metric, n: TopN) -> Vec<SellerSummary> {
    let mut ranked: Vec<&SellerSummary> = table.iter().collect();
    ranked.sort_by(|a, b| b.value(metric).total_cmp(&a.value(metric)));
    ranked.into_iter().take(n.get()).cloned().collect()
}
