// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::source_service::SourceService;

#[derive(Clone)]
pub struct AppState {
    pub source_service: SourceService,
    pub dashboard_service: DashboardService,
}
