// Body measurement domain models
use chrono::NaiveDateTime;
use std::collections::BTreeSet;

pub const UNKNOWN_SOURCE: &str = "unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub weight: f64,
    pub fat_percentage: Option<f64>,
    pub bmi: Option<f64>,
    pub source: String,
}

impl Sample {
    pub fn new(
        timestamp: NaiveDateTime,
        weight: f64,
        fat_percentage: Option<f64>,
        bmi: Option<f64>,
        source: String,
    ) -> Self {
        Self {
            timestamp,
            weight,
            fat_percentage,
            bmi,
            source,
        }
    }
}

/// Samples in ascending timestamp order.
///
/// Samples sharing a timestamp are kept and stay in the order they were given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    pub fn new(mut samples: Vec<Sample>) -> Self {
        // sort_by is stable
        samples.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Distinct source labels in first-seen order
    pub fn sources(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.samples
            .iter()
            .filter(|s| seen.insert(s.source.as_str()))
            .map(|s| s.source.clone())
            .collect()
    }

    pub fn filter_sources(&self, selected: &BTreeSet<String>) -> Series {
        Self {
            samples: self
                .samples
                .iter()
                .filter(|s| selected.contains(&s.source))
                .cloned()
                .collect(),
        }
    }

    /// Express every metric as a percentage of the first sample's value.
    ///
    /// Metrics whose baseline is missing or zero are left unset.
    pub fn normalized(&self) -> Series {
        let Some(baseline) = self.first().cloned() else {
            return self.clone();
        };

        let samples = self
            .samples
            .iter()
            .map(|s| Sample {
                timestamp: s.timestamp,
                weight: percent_of(s.weight, baseline.weight).unwrap_or(s.weight),
                fat_percentage: s
                    .fat_percentage
                    .zip(baseline.fat_percentage)
                    .and_then(|(v, b)| percent_of(v, b)),
                bmi: s.bmi.zip(baseline.bmi).and_then(|(v, b)| percent_of(v, b)),
                source: s.source.clone(),
            })
            .collect();

        Self { samples }
    }
}

fn percent_of(value: f64, baseline: f64) -> Option<f64> {
    if baseline == 0.0 || !baseline.is_finite() {
        return None;
    }
    Some(round_to_tenth(value / baseline * 100.0))
}

pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
