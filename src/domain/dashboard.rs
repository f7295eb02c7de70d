// Dashboard domain model
use super::chart::ChartData;
use super::trend::TrendView;

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub date: String,
    pub time: String,
    pub weight: f64,
    pub fat_percentage: Option<f64>,
    pub bmi: Option<f64>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub rows: Vec<TableRow>,
    pub total_entries: usize,
    pub expanded: bool,
    pub notice: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub title: String,
    pub source_id: String,
    pub available_sources: Vec<String>,
    pub selected_sources: Vec<String>,
    pub normalized: bool,
    pub table: TableView,
    pub data_chart: ChartData,
    pub trend: TrendView,
}
