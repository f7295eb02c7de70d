// Source service - Use case for listing sample sources
use crate::application::sample_repository::SampleRepository;
use crate::domain::source::SampleSource;
use std::sync::Arc;

#[derive(Clone)]
pub struct SourceService {
    repository: Arc<dyn SampleRepository>,
}

impl SourceService {
    pub fn new(repository: Arc<dyn SampleRepository>) -> Self {
        Self { repository }
    }

    pub fn list_sources(&self) -> Vec<SampleSource> {
        self.repository.list_sources()
    }
}
