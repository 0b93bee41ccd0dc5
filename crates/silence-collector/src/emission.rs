//! Gauge samples derived from normalized silences.

use chrono::DateTime;
use tracing::warn;

use crate::error::{Result, SilenceError};
use crate::normalize::{LABEL_ID, LABEL_TENANT, NormalizedSilence};

/// Label set of a sample, in encoding order.
pub type LabelSet = Vec<(String, String)>;

/// Label carrying the message of a failed collection.
pub const LABEL_ERROR: &str = "error";

/// The metric families this exporter publishes. All of them are gauges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// One sample per silence with the full label set; 1 if active, else 0.
    Info,
    /// Silence start time in Unix seconds.
    StartTime,
    /// Silence end time in Unix seconds.
    EndTime,
    /// Emitted alone when a scrape could not fetch silences.
    CollectionError,
}

impl MetricKind {
    /// Every kind, in registration order.
    pub const ALL: [Self; 4] = [
        Self::Info,
        Self::StartTime,
        Self::EndTime,
        Self::CollectionError,
    ];

    /// Metric name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Info => "alertmanager_silence_info",
            Self::StartTime => "alertmanager_silence_start_seconds",
            Self::EndTime => "alertmanager_silence_end_seconds",
            Self::CollectionError => "alertmanager_silences_collection_error",
        }
    }

    /// Help text.
    #[must_use]
    pub const fn help(&self) -> &'static str {
        match self {
            Self::Info => "Alertmanager silence info metric",
            Self::StartTime => "Alertmanager silence start time, elapsed seconds since epoch",
            Self::EndTime => "Alertmanager silence end time, elapsed seconds since epoch",
            Self::CollectionError => "Set when silences could not be collected from Alertmanager",
        }
    }
}

/// One gauge value with its labels.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    /// Which family the sample belongs to.
    pub kind: MetricKind,
    /// Labels, in encoding order.
    pub labels: LabelSet,
    /// Gauge value.
    pub value: f64,
}

impl MetricSample {
    /// Metric name of the sample.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Looks up a label value by name.
    #[must_use]
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Builds the samples for one silence.
///
/// Always yields the info sample. The start and end samples are each skipped,
/// with a warning, when their timestamp is missing or not RFC 3339.
#[must_use]
pub fn emit(silence: &NormalizedSilence) -> Vec<MetricSample> {
    let mut samples = Vec::with_capacity(3);

    samples.push(MetricSample {
        kind: MetricKind::Info,
        labels: silence
            .labels()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        value: if silence.status().is_active() { 1.0 } else { 0.0 },
    });

    let time_samples = [
        (MetricKind::StartTime, "startsAt", silence.starts_at()),
        (MetricKind::EndTime, "endsAt", silence.ends_at()),
    ];
    for (kind, field, raw) in time_samples {
        match unix_seconds(field, raw) {
            Ok(value) => samples.push(MetricSample {
                kind,
                labels: identity_labels(silence),
                value,
            }),
            Err(err) => {
                warn!(silence_id = %silence.id(), field, error = %err, "skipping silence time sample");
            }
        }
    }

    samples
}

/// Builds the sentinel sample for a failed collection pass.
#[must_use]
pub fn collection_error(error: &SilenceError, tenant: Option<&str>) -> MetricSample {
    let mut labels = vec![(LABEL_ERROR.to_string(), error.to_string())];
    if let Some(tenant) = tenant {
        labels.push((LABEL_TENANT.to_string(), tenant.to_string()));
    }
    MetricSample {
        kind: MetricKind::CollectionError,
        labels,
        value: 1.0,
    }
}

/// Parses an RFC 3339 timestamp into whole Unix seconds.
///
/// # Errors
///
/// Returns [`SilenceError::TimestampParse`] if the value is missing or invalid.
pub fn unix_seconds(field: &'static str, raw: Option<&str>) -> Result<f64> {
    let value = raw.unwrap_or_default();
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.timestamp() as f64)
        .map_err(|e| SilenceError::TimestampParse {
            field,
            value: value.to_string(),
            reason: if raw.is_none() {
                "missing".to_string()
            } else {
                e.to_string()
            },
        })
}

fn identity_labels(silence: &NormalizedSilence) -> LabelSet {
    let mut labels = vec![(LABEL_ID.to_string(), silence.id().to_string())];
    if let Some(tenant) = silence.tenant() {
        labels.push((LABEL_TENANT.to_string(), tenant.to_string()));
    }
    labels
}
