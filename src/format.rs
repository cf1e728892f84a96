//! Display helper for metric cards.

const SCALES: [&str; 2] = ["", "mil"];
const TOP_SCALE: &str = "milhões";

/// Format `value` as `"{prefix} {scaled:.2} {label}"`.
///
/// Scales are unscaled, thousands (`mil`) and millions (`milhões`); anything
/// past a million stays in millions. The trailing space on unscaled values is
/// part of the format.
pub fn format_number(value: f64, prefix: &str) -> String {
    let mut v = value;
    for label in SCALES {
        if v < 1000.0 {
            return format!("{prefix} {v:.2} {label}");
        }
        v /= 1000.0;
    }
    format!("{prefix} {v:.2} {TOP_SCALE}")
}
