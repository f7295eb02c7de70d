// Sample source domain model
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum SourceLocation {
    Url(String),
    Path(PathBuf),
}

/// A configured CSV feed of samples
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSource {
    pub id: String,
    pub name: String,
    pub location: SourceLocation,
}

impl SampleSource {
    pub fn new(id: String, name: Option<String>, location: SourceLocation) -> Self {
        let name = name.unwrap_or_else(|| Self::format_name(&id));
        Self { id, name, location }
    }

    fn format_name(id: &str) -> String {
        // Convert "home_scale_" to "home scale"
        id.trim_end_matches('_').replace('_', " ")
    }
}
