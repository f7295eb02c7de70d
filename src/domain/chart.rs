// Chart domain models
use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    pub label: String,
    pub timestamp: NaiveDateTime,
    pub value: Option<f64>,
}

impl TimeSeriesPoint {
    pub fn new(label: String, timestamp: NaiveDateTime, value: Option<f64>) -> Self {
        Self {
            label,
            timestamp,
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Axis {
    Primary,
    Secondary,
}

#[derive(Debug, Clone)]
pub struct SeriesData {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub axis: Axis,
    pub points: Vec<TimeSeriesPoint>,
}

impl SeriesData {
    pub fn new(
        id: String,
        name: String,
        color: Option<String>,
        axis: Axis,
        points: Vec<TimeSeriesPoint>,
    ) -> Self {
        Self {
            id,
            name,
            color,
            axis,
            points,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub unit: Option<String>,
    pub kind: ChartKind,
    pub secondary_domain: Option<(f64, f64)>,
    pub series: Vec<SeriesData>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartKind {
    MultiLine,
}

impl ChartData {
    pub fn new(
        id: String,
        title: String,
        unit: Option<String>,
        kind: ChartKind,
        secondary_domain: Option<(f64, f64)>,
        series: Vec<SeriesData>,
    ) -> Self {
        Self {
            id,
            title,
            unit,
            kind,
            secondary_domain,
            series,
        }
    }
}
