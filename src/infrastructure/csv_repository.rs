// CSV repository implementation
use crate::application::sample_repository::SampleRepository;
use crate::domain::sample::{Sample, UNKNOWN_SOURCE};
use crate::domain::source::{SampleSource, SourceLocation};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;
use thiserror::Error;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to fetch {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("fetching {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error parsing CSV")]
    Parse(#[from] csv::Error),
}

#[derive(Debug, Clone)]
pub struct CsvSampleRepository {
    sources: Vec<SampleSource>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct CsvRecord {
    date: Option<String>,
    time: Option<String>,
    weight: Option<String>,
    fat_percentage: Option<String>,
    bmi: Option<String>,
    source: Option<String>,
}

impl CsvRecord {
    fn into_sample(self) -> Option<Sample> {
        let timestamp = parse_timestamp(self.date.as_deref()?, self.time.as_deref())?;
        let weight = parse_number(self.weight.as_deref())?;
        let source = self
            .source
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN_SOURCE.to_string());

        Some(Sample::new(
            timestamp,
            weight,
            parse_number(self.fat_percentage.as_deref()),
            parse_number(self.bmi.as_deref()),
            source,
        ))
    }
}

impl CsvSampleRepository {
    pub fn new(sources: Vec<SampleSource>) -> Self {
        Self {
            sources,
            client: reqwest::Client::new(),
        }
    }

    async fn fetch(&self, location: &SourceLocation) -> Result<Vec<u8>, ImportError> {
        match location {
            SourceLocation::Url(url) => {
                let response = self
                    .client
                    .get(url)
                    .header("Accept", "text/csv")
                    .send()
                    .await
                    .map_err(|source| ImportError::Fetch {
                        url: url.clone(),
                        source,
                    })?;

                if !response.status().is_success() {
                    return Err(ImportError::Status {
                        url: url.clone(),
                        status: response.status(),
                    });
                }

                let body = response.bytes().await.map_err(|source| ImportError::Fetch {
                    url: url.clone(),
                    source,
                })?;
                Ok(body.to_vec())
            }
            SourceLocation::Path(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| ImportError::Read {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }
}

#[async_trait]
impl SampleRepository for CsvSampleRepository {
    fn list_sources(&self) -> Vec<SampleSource> {
        self.sources.clone()
    }

    async fn load_samples(&self, source: &SampleSource) -> Result<Vec<Sample>> {
        let body = self
            .fetch(&source.location)
            .await
            .with_context(|| format!("Failed to load source {}", source.id))?;

        let samples = parse_samples(body.as_slice())
            .with_context(|| format!("Failed to parse source {}", source.id))?;

        tracing::debug!("Parsed {} samples from source {}", samples.len(), source.id);
        Ok(samples)
    }
}

/// Parse a headed CSV into samples, dropping rows without a usable date or
/// weight.
pub fn parse_samples<R: Read>(reader: R) -> Result<Vec<Sample>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();
    for (index, record) in reader.deserialize::<CsvRecord>().enumerate() {
        match record?.into_sample() {
            Some(sample) => samples.push(sample),
            None => {
                // header is line 1
                tracing::debug!("Dropping CSV row {}: missing or invalid date/weight", index + 2);
            }
        }
    }

    Ok(samples)
}

fn parse_timestamp(date: &str, time: Option<&str>) -> Option<NaiveDateTime> {
    let date = date.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(date) {
        return Some(timestamp.naive_local());
    }

    let day = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date, format).ok())?;

    let time = match time.map(str::trim).filter(|t| !t.is_empty()) {
        Some(time) => TIME_FORMATS
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(time, format).ok())
            .unwrap_or_else(|| {
                tracing::debug!("Unreadable time {:?} on {}, using midnight", time, date);
                NaiveTime::MIN
            }),
        None => NaiveTime::MIN,
    };

    Some(day.and_time(time))
}

fn parse_number(value: Option<&str>) -> Option<f64> {
    value?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
