// Repository trait for body measurement data access
use crate::domain::sample::Sample;
use crate::domain::source::SampleSource;
use async_trait::async_trait;

#[async_trait]
pub trait SampleRepository: Send + Sync {
    /// List the configured sample sources
    fn list_sources(&self) -> Vec<SampleSource>;

    /// Look up one configured source by id
    fn find_source(&self, source_id: &str) -> Option<SampleSource> {
        self.list_sources().into_iter().find(|s| s.id == source_id)
    }

    /// Load every usable sample from a source, in file order
    async fn load_samples(&self, source: &SampleSource) -> anyhow::Result<Vec<Sample>>;
}
