// HTTP request handlers
use crate::application::dashboard_service::DashboardError;
use crate::application::view_state::ViewState;
use crate::infrastructure::http_response::{error_response, json_response};
use crate::infrastructure::json_mapper::{
    dashboard_to_json, source_to_json, trend_to_json, SourceDto,
};
use crate::presentation::app_state::AppState;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{Response, StatusCode},
};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Comma-separated source labels
    pub sources: Option<String>,
    pub normalize: Option<bool>,
    pub expanded: Option<bool>,
    pub target: Option<f64>,
}

impl DashboardQuery {
    fn view_state(&self) -> ViewState {
        let selected_sources = self.sources.as_ref().map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<BTreeSet<String>>()
        });

        ViewState {
            selected_sources,
            normalize: self.normalize.unwrap_or(false),
            table_expanded: self.expanded.unwrap_or(false),
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List configured sample sources
pub async fn list_sources(State(state): State<Arc<AppState>>) -> Response<Body> {
    let sources: Vec<SourceDto> = state
        .source_service
        .list_sources()
        .into_iter()
        .map(source_to_json)
        .collect();

    json_response(StatusCode::OK, &sources)
}

/// Full dashboard for one source
pub async fn get_dashboard(
    Path(id): Path<String>,
    Query(query): Query<DashboardQuery>,
    State(state): State<Arc<AppState>>,
) -> Response<Body> {
    if let Some(response) = reject_bad_target(&query) {
        return response;
    }

    match state
        .dashboard_service
        .get_dashboard(&id, &query.view_state(), query.target)
        .await
    {
        Ok(dashboard) => json_response(StatusCode::OK, &dashboard_to_json(dashboard)),
        Err(e) => dashboard_error(e),
    }
}

/// Trend analysis only
pub async fn get_trend(
    Path(id): Path<String>,
    Query(query): Query<DashboardQuery>,
    State(state): State<Arc<AppState>>,
) -> Response<Body> {
    if let Some(response) = reject_bad_target(&query) {
        return response;
    }

    match state
        .dashboard_service
        .get_trend(&id, &query.view_state(), query.target)
        .await
    {
        Ok(trend) => json_response(StatusCode::OK, &trend_to_json(trend)),
        Err(e) => dashboard_error(e),
    }
}

fn reject_bad_target(query: &DashboardQuery) -> Option<Response<Body>> {
    query
        .target
        .filter(|t| !t.is_finite() || *t <= 0.0)
        .map(|t| error_response(StatusCode::BAD_REQUEST, &format!("invalid target {}", t)))
}

fn dashboard_error(error: DashboardError) -> Response<Body> {
    let status = match error {
        DashboardError::UnknownSource(_) => StatusCode::NOT_FOUND,
        DashboardError::Load { .. } => StatusCode::BAD_GATEWAY,
    };
    error_response(status, &error.to_string())
}
