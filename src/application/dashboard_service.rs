// Dashboard service - Use case for building weight dashboards
use crate::application::sample_repository::SampleRepository;
use crate::application::trend_estimator::{analyze_trend, INSUFFICIENT_DATA_MESSAGE};
use crate::application::view_state::ViewState;
use crate::domain::chart::{Axis, ChartData, ChartKind, SeriesData, TimeSeriesPoint};
use crate::domain::dashboard::Dashboard;
use crate::domain::sample::{Sample, Series};
use crate::domain::trend::TrendView;
use crate::infrastructure::config::TrendSettings;
use std::sync::Arc;
use thiserror::Error;

const DASHBOARD_TITLE: &str = "Weight Data Tracker";
const METRICS_DOMAIN: (f64, f64) = (10.0, 30.0);

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("unknown source {0}")]
    UnknownSource(String),
    #[error("failed to load source {source_id}: {message}")]
    Load { source_id: String, message: String },
}

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn SampleRepository>,
    trend_settings: TrendSettings,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn SampleRepository>, trend_settings: TrendSettings) -> Self {
        Self {
            repository,
            trend_settings,
        }
    }

    pub async fn get_dashboard(
        &self,
        source_id: &str,
        view: &ViewState,
        target_weight: Option<f64>,
    ) -> Result<Dashboard, DashboardError> {
        let series = self.load_series(source_id).await?;

        let filtered = view.filter(&series);
        if filtered.is_empty() && !series.is_empty() {
            tracing::debug!("Source filter excluded every sample of {}", source_id);
        }
        let displayed = view.display(&series);
        let trend = self.trend_view(&filtered, target_weight);

        Ok(Dashboard {
            title: DASHBOARD_TITLE.to_string(),
            source_id: source_id.to_string(),
            available_sources: series.sources(),
            selected_sources: view.selected_in(&series),
            normalized: view.normalize,
            table: view.table(&displayed),
            data_chart: build_data_chart(&displayed, view.normalize),
            trend,
        })
    }

    pub async fn get_trend(
        &self,
        source_id: &str,
        view: &ViewState,
        target_weight: Option<f64>,
    ) -> Result<TrendView, DashboardError> {
        let series = self.load_series(source_id).await?;
        Ok(self.trend_view(&view.filter(&series), target_weight))
    }

    async fn load_series(&self, source_id: &str) -> Result<Series, DashboardError> {
        let source = self
            .repository
            .find_source(source_id)
            .ok_or_else(|| DashboardError::UnknownSource(source_id.to_string()))?;

        let samples = self
            .repository
            .load_samples(&source)
            .await
            .map_err(|e| {
                tracing::warn!("Error loading source {}: {:#}", source_id, e);
                DashboardError::Load {
                    source_id: source_id.to_string(),
                    message: format!("{:#}", e),
                }
            })?;

        tracing::debug!("Loaded {} samples from {}", samples.len(), source_id);
        Ok(Series::new(samples))
    }

    // Trend runs on absolute weights, never the normalized view
    fn trend_view(&self, series: &Series, target_weight: Option<f64>) -> TrendView {
        let target = target_weight.unwrap_or(self.trend_settings.target_weight);
        match analyze_trend(series, target, self.trend_settings.projection_points) {
            Ok(analysis) => TrendView::Available(analysis),
            Err(e) => {
                tracing::debug!("Trend unavailable: {}", e);
                TrendView::Unavailable {
                    message: INSUFFICIENT_DATA_MESSAGE.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn build_data_chart(series: &Series, normalized: bool) -> ChartData {
    let metrics: [(&str, &str, &str, Axis, fn(&Sample) -> Option<f64>); 3] = [
        ("weight", "Weight", "#8884d8", Axis::Primary, |s| Some(s.weight)),
        ("fat_percentage", "Body Fat %", "#82ca9d", Axis::Secondary, |s| {
            s.fat_percentage
        }),
        ("bmi", "BMI", "#ffc658", Axis::Secondary, |s| s.bmi),
    ];

    let series_list = metrics
        .into_iter()
        .filter_map(|(id, name, color, axis, value)| {
            let points: Vec<TimeSeriesPoint> = series
                .samples()
                .iter()
                .map(|s| {
                    TimeSeriesPoint::new(
                        s.timestamp.format("%d/%m").to_string(),
                        s.timestamp,
                        value(s),
                    )
                })
                .collect();

            // Only keep metrics with at least one value
            if points.iter().all(|p| p.value.is_none()) {
                return None;
            }
            Some(SeriesData::new(
                id.to_string(),
                name.to_string(),
                Some(color.to_string()),
                axis,
                points,
            ))
        })
        .collect();

    ChartData::new(
        "body-metrics".to_string(),
        "Data Preview".to_string(),
        Some(if normalized { "%" } else { "kg" }.to_string()),
        ChartKind::MultiLine,
        Some(METRICS_DOMAIN),
        series_list,
    )
}
