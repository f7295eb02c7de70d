// Application layer - Use cases and the trend pipeline
pub mod dashboard_service;
pub mod sample_repository;
pub mod source_service;
pub mod trend_estimator;
pub mod view_state;
