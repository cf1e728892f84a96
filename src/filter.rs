//! # Seller filter
//! Narrows a fetched dataset to the salespeople picked in the UI.
//!
//! The source slice is only borrowed, so the same fetch can be re-filtered
//! as often as the selection changes.

use std::collections::BTreeSet;

use crate::ingest::types::SalesRecord;

/// Records whose seller is in `sellers`, in original order.
///
/// An empty allow-list means "no filter" and returns every record.
pub fn by_sellers<S: AsRef<str>>(records: &[SalesRecord], sellers: &[S]) -> Vec<SalesRecord> {
    if sellers.is_empty() {
        return records.to_vec();
    }
    let allow: BTreeSet<&str> = sellers.iter().map(AsRef::as_ref).collect();
    records
        .iter()
        .filter(|r| allow.contains(r.seller.as_str()))
        .cloned()
        .collect()
}

/// Distinct seller names, sorted, for populating the multi-select.
pub fn distinct_sellers(records: &[SalesRecord]) -> Vec<String> {
    let set: BTreeSet<&str> = records.iter().map(|r| r.seller.as_str()).collect();
    set.into_iter().map(str::to_string).collect()
}
