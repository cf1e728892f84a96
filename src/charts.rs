//! Chart specifications for the dashboard UI.
//!
//! Each summary table is bound to a chart description the front end can hand
//! to its plotting library unchanged:
//! - **geo**: bubble map of states (bubble size = value)
//! - **line**: monthly series, one line per year (color and dash by year)
//! - **bar**: labelled bars with the value printed on each bar
//!
//! Titles follow the dashboard's Portuguese UI.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregate::{CategorySummary, LocationSummary, Metric, MonthlySummary, SellerSummary};

/// Rows shown in the "top states" bar charts.
pub const TOP_STATES: usize = 5;

const GEO_SCOPE: &str = "south america";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Geo(GeoChart),
    Line(LineChart),
    Bar(BarChart),
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Geo(c) => &c.title,
            ChartSpec::Line(c) => &c.title,
            ChartSpec::Bar(c) => &c.title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub label: String,
    pub lat: f64,
    pub lon: f64,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoChart {
    pub title: String,
    pub scope: &'static str,
    pub points: Vec<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    /// Series key; the year drives both color and dash.
    pub year: i32,
    pub x: Vec<String>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub y_axis_title: String,
    pub markers: bool,
    pub y_range: (f64, f64),
    pub series: Vec<LineSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub y_axis_title: Option<String>,
    pub orientation: Orientation,
    pub text_auto: bool,
    pub show_legend: bool,
    pub bars: Vec<Bar>,
}

impl BarChart {
    fn vertical(title: impl Into<String>, y_axis_title: Option<&str>, bars: Vec<Bar>) -> Self {
        Self {
            title: title.into(),
            y_axis_title: y_axis_title.map(str::to_string),
            orientation: Orientation::Vertical,
            text_auto: true,
            show_legend: true,
            bars,
        }
    }
}

pub fn location_map(title: &str, rows: &[LocationSummary]) -> ChartSpec {
    ChartSpec::Geo(GeoChart {
        title: title.to_string(),
        scope: GEO_SCOPE,
        points: rows
            .iter()
            .map(|r| GeoPoint {
                label: r.location.clone(),
                lat: r.latitude,
                lon: r.longitude,
                size: r.value,
            })
            .collect(),
    })
}

/// Split a chronological monthly table into one series per year.
pub fn monthly_line(title: &str, y_axis_title: &str, rows: &[MonthlySummary]) -> ChartSpec {
    let mut by_year: BTreeMap<i32, LineSeries> = BTreeMap::new();
    for r in rows {
        let s = by_year.entry(r.year).or_insert_with(|| LineSeries {
            year: r.year,
            x: Vec::new(),
            y: Vec::new(),
        });
        s.x.push(r.month.clone());
        s.y.push(r.value);
    }
    let max = rows.iter().map(|r| r.value).fold(0.0_f64, f64::max);

    ChartSpec::Line(LineChart {
        title: title.to_string(),
        y_axis_title: y_axis_title.to_string(),
        markers: true,
        y_range: (0.0, max),
        series: by_year.into_values().collect(),
    })
}

pub fn top_locations_bar(title: &str, y_axis_title: &str, rows: &[LocationSummary]) -> ChartSpec {
    let bars = rows
        .iter()
        .take(TOP_STATES)
        .map(|r| Bar {
            label: r.location.clone(),
            value: r.value,
        })
        .collect();
    ChartSpec::Bar(BarChart::vertical(title, Some(y_axis_title), bars))
}

pub fn category_bar(
    title: &str,
    y_axis_title: &str,
    rows: &[CategorySummary],
    show_legend: bool,
) -> ChartSpec {
    let bars = rows
        .iter()
        .map(|r| Bar {
            label: r.category.clone(),
            value: r.value,
        })
        .collect();
    let mut chart = BarChart::vertical(title, Some(y_axis_title), bars);
    chart.show_legend = show_legend;
    ChartSpec::Bar(chart)
}

/// Horizontal leaderboard bar; `rows` must already be ranked.
pub fn seller_bar(title: &str, rows: &[SellerSummary], metric: Metric) -> ChartSpec {
    let bars = rows
        .iter()
        .map(|r| Bar {
            label: r.seller.clone(),
            value: r.value(metric),
        })
        .collect();
    let mut chart = BarChart::vertical(title, None, bars);
    chart.orientation = Orientation::Horizontal;
    ChartSpec::Bar(chart)
}
