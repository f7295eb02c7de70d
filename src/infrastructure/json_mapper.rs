// Mapper to convert domain models to JSON wire types
use crate::domain::chart::{Axis, ChartData, ChartKind, SeriesData, TimeSeriesPoint};
use crate::domain::dashboard::{Dashboard, TableRow, TableView};
use crate::domain::source::SampleSource;
use crate::domain::trend::{ChartPoint, Deviation, TrendAnalysis, TrendDirection, TrendView};
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDto {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    pub title: String,
    pub source_id: String,
    pub available_sources: Vec<String>,
    pub selected_sources: Vec<String>,
    pub normalized: bool,
    pub table: TableDto,
    pub data_chart: ChartDto,
    pub trend: TrendDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDto {
    pub rows: Vec<TableRowDto>,
    pub total_entries: usize,
    pub expanded: bool,
    pub notice: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRowDto {
    pub date: String,
    pub time: String,
    pub weight: f64,
    pub fat_percentage: Option<f64>,
    pub bmi: Option<f64>,
    pub source: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDto {
    pub id: String,
    pub title: String,
    pub unit: Option<String>,
    pub kind: &'static str,
    pub secondary_y_min: Option<f64>,
    pub secondary_y_max: Option<f64>,
    pub series: Vec<SeriesDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesDto {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub axis: &'static str,
    pub points: Vec<PointDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointDto {
    pub label: String,
    pub time_ms: i64,
    pub value: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum TrendDto {
    #[serde(rename_all = "camelCase")]
    Available {
        target_weight: f64,
        slope: f64,
        intercept: f64,
        r_squared: f64,
        sample_count: usize,
        weekly_rate: f64,
        moving_away: bool,
        target_reached: bool,
        days_remaining: Option<i64>,
        estimated_date_ms: Option<i64>,
        estimated_date: Option<String>,
        deviation: Option<DeviationDto>,
        y_min: Option<f64>,
        y_max: Option<f64>,
        points: Vec<TrendPointDto>,
    },
    #[serde(rename_all = "camelCase")]
    Unavailable { message: String, reason: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviationDto {
    pub standard_error: f64,
    pub t_value: f64,
    pub degrees_of_freedom: usize,
}

/// Chart consumers draw `weight` with connectNulls=false and the trend and
/// bound lines with connectNulls=true.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPointDto {
    pub label: String,
    pub time_ms: i64,
    pub weight: Option<f64>,
    pub trend_weight: Option<f64>,
    pub upper_bound: Option<f64>,
    pub lower_bound: Option<f64>,
    pub is_trendpoint: bool,
}

pub fn source_to_json(source: SampleSource) -> SourceDto {
    SourceDto {
        id: source.id,
        name: source.name,
    }
}

pub fn dashboard_to_json(dashboard: Dashboard) -> DashboardDto {
    DashboardDto {
        title: dashboard.title,
        source_id: dashboard.source_id,
        available_sources: dashboard.available_sources,
        selected_sources: dashboard.selected_sources,
        normalized: dashboard.normalized,
        table: table_to_json(dashboard.table),
        data_chart: chart_to_json(dashboard.data_chart),
        trend: trend_to_json(dashboard.trend),
    }
}

fn table_to_json(table: TableView) -> TableDto {
    TableDto {
        rows: table.rows.into_iter().map(row_to_json).collect(),
        total_entries: table.total_entries,
        expanded: table.expanded,
        notice: table.notice,
    }
}

fn row_to_json(row: TableRow) -> TableRowDto {
    TableRowDto {
        date: row.date,
        time: row.time,
        weight: row.weight,
        fat_percentage: row.fat_percentage,
        bmi: row.bmi,
        source: row.source,
    }
}

fn chart_to_json(chart: ChartData) -> ChartDto {
    let kind = match chart.kind {
        ChartKind::MultiLine => "multiLine",
    };

    ChartDto {
        id: chart.id,
        title: chart.title,
        unit: chart.unit,
        kind,
        secondary_y_min: chart.secondary_domain.map(|(min, _)| min),
        secondary_y_max: chart.secondary_domain.map(|(_, max)| max),
        series: chart.series.into_iter().map(series_to_json).collect(),
    }
}

fn series_to_json(series: SeriesData) -> SeriesDto {
    let axis = match series.axis {
        Axis::Primary => "primary",
        Axis::Secondary => "secondary",
    };

    SeriesDto {
        id: series.id,
        name: series.name,
        color: series.color,
        axis,
        points: series.points.into_iter().map(point_to_json).collect(),
    }
}

fn point_to_json(point: TimeSeriesPoint) -> PointDto {
    PointDto {
        label: point.label,
        time_ms: time_ms(point.timestamp),
        value: point.value,
    }
}

pub fn trend_to_json(trend: TrendView) -> TrendDto {
    match trend {
        TrendView::Available(analysis) => analysis_to_json(analysis),
        TrendView::Unavailable { message, reason } => TrendDto::Unavailable { message, reason },
    }
}

fn analysis_to_json(analysis: TrendAnalysis) -> TrendDto {
    let days_remaining = analysis.days_remaining_rounded();
    TrendDto::Available {
        target_weight: analysis.target_weight,
        slope: analysis.slope,
        intercept: analysis.intercept,
        r_squared: analysis.r_squared,
        sample_count: analysis.sample_count,
        weekly_rate: analysis.weekly_rate,
        moving_away: analysis.direction.is_moving_away(),
        target_reached: analysis.direction == TrendDirection::TargetReached,
        days_remaining,
        estimated_date_ms: analysis.estimated_date.map(time_ms),
        estimated_date: analysis
            .estimated_date
            .map(|d| d.format("%d/%m/%Y").to_string()),
        deviation: analysis.deviation.map(deviation_to_json),
        y_min: analysis.y_domain.map(|(min, _)| min),
        y_max: analysis.y_domain.map(|(_, max)| max),
        points: analysis.points.into_iter().map(trend_point_to_json).collect(),
    }
}

fn deviation_to_json(deviation: Deviation) -> DeviationDto {
    DeviationDto {
        standard_error: deviation.standard_error,
        t_value: deviation.t_value,
        degrees_of_freedom: deviation.degrees_of_freedom,
    }
}

fn trend_point_to_json(point: ChartPoint) -> TrendPointDto {
    TrendPointDto {
        label: point.label,
        time_ms: time_ms(point.timestamp),
        weight: point.weight,
        trend_weight: point.trend_weight,
        upper_bound: point.upper_bound,
        lower_bound: point.lower_bound,
        is_trendpoint: point.is_projection,
    }
}

fn time_ms(timestamp: NaiveDateTime) -> i64 {
    timestamp.and_utc().timestamp_millis()
}
