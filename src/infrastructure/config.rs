use crate::domain::source::{SampleSource, SourceLocation};
use serde::Deserialize;
use std::ops::RangeInclusive;
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TARGET_WEIGHT: f64 = 64.0;
const DEFAULT_PROJECTION_POINTS: i64 = 3;
const PROJECTION_POINTS_RANGE: RangeInclusive<usize> = 3..=4;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub trend: TrendSettings,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_addr: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct TrendSettings {
    pub target_weight: f64,
    pub projection_points: usize,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            target_weight: DEFAULT_TARGET_WEIGHT,
            projection_points: DEFAULT_PROJECTION_POINTS as usize,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub id: String,
    pub name: Option<String>,
    pub url: Option<String>,
    pub path: Option<PathBuf>,
}

impl SourceConfig {
    pub fn to_source(&self) -> anyhow::Result<SampleSource> {
        let location = match (&self.url, &self.path) {
            (Some(url), None) => SourceLocation::Url(url.clone()),
            (None, Some(path)) => SourceLocation::Path(path.clone()),
            _ => anyhow::bail!("source {} needs exactly one of url or path", self.id),
        };
        Ok(SampleSource::new(self.id.clone(), self.name.clone(), location))
    }
}

impl TrendSettings {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.target_weight.is_finite() || self.target_weight <= 0.0 {
            anyhow::bail!(
                "trend.target_weight must be a positive number, got {}",
                self.target_weight
            );
        }
        if !PROJECTION_POINTS_RANGE.contains(&self.projection_points) {
            anyhow::bail!(
                "trend.projection_points must be between {} and {}, got {}",
                PROJECTION_POINTS_RANGE.start(),
                PROJECTION_POINTS_RANGE.end(),
                self.projection_points
            );
        }
        Ok(())
    }
}

impl AppConfig {
    pub fn sample_sources(&self) -> anyhow::Result<Vec<SampleSource>> {
        self.sources.iter().map(SourceConfig::to_source).collect()
    }
}

fn builder() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("server.bind_addr", DEFAULT_BIND_ADDR)?
        .set_default("trend.target_weight", DEFAULT_TARGET_WEIGHT)?
        .set_default("trend.projection_points", DEFAULT_PROJECTION_POINTS)?)
}

/// Defaults, then `config/weight_tracker.toml`, then `WEIGHT_TRACKER__*` env vars
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = builder()?
        .add_source(config::File::with_name("config/weight_tracker").required(false))
        .add_source(
            config::Environment::with_prefix("WEIGHT_TRACKER")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    config.trend.validate()?;
    Ok(config)
}
