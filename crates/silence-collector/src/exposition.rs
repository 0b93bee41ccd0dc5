//! Prometheus text exposition of silence samples.
//!
//! A [`SilenceRegistry`] is built for a single scrape: the collector's samples
//! are recorded into one gauge family per [`MetricKind`] and the registry is
//! encoded and dropped. Nothing is kept between scrapes, so silences that
//! disappear from Alertmanager disappear from the output too.
//!
//! # Example
//!
//! ```rust
//! use silence_collector::emission::{MetricKind, MetricSample};
//! use silence_collector::exposition::SilenceRegistry;
//!
//! let registry = SilenceRegistry::from_samples(&[MetricSample {
//!     kind: MetricKind::StartTime,
//!     labels: vec![("id".to_string(), "abcd-1234".to_string())],
//!     value: 1_582_236_753.0,
//! }]);
//!
//! let output = registry.encode();
//! assert!(output.contains("alertmanager_silence_start_seconds"));
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::AtomicU64;

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;

use crate::emission::{LabelSet, MetricKind, MetricSample};

type GaugeFamily = Family<LabelSet, Gauge<f64, AtomicU64>>;

/// Per-scrape registry holding the silence gauge families.
pub struct SilenceRegistry {
    registry: Registry,
    families: HashMap<MetricKind, GaugeFamily>,
}

impl std::fmt::Debug for SilenceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SilenceRegistry")
            .field("families", &self.families.len())
            .finish_non_exhaustive()
    }
}

impl Default for SilenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SilenceRegistry {
    /// Creates a registry with every silence family registered and empty.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Registry::default();
        let mut families = HashMap::with_capacity(MetricKind::ALL.len());

        for kind in MetricKind::ALL {
            let family = GaugeFamily::default();
            registry.register(kind.name(), kind.help(), family.clone());
            families.insert(kind, family);
        }

        Self { registry, families }
    }

    /// Creates a registry and records all given samples.
    #[must_use]
    pub fn from_samples(samples: &[MetricSample]) -> Self {
        let registry = Self::new();
        for sample in samples {
            registry.record(sample);
        }
        registry
    }

    /// Records one sample. A later sample with the same labels replaces it.
    ///
    /// Label values are escaped here; the encoder writes them verbatim.
    pub fn record(&self, sample: &MetricSample) {
        if let Some(family) = self.families.get(&sample.kind) {
            let labels: LabelSet = sample
                .labels
                .iter()
                .map(|(name, value)| (name.clone(), escape_label_value(value).into_owned()))
                .collect();
            family.get_or_create(&labels).set(sample.value);
        }
    }

    /// Encodes all families in Prometheus text format.
    ///
    /// Families without samples only contribute their `HELP`/`TYPE` lines.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        if encode(&mut buffer, &self.registry).is_err() {
            tracing::error!("failed to encode silence metrics");
            return String::new();
        }
        buffer
    }

    /// Returns the Content-Type header value for the encoded output.
    #[must_use]
    pub const fn content_type() -> &'static str {
        "text/plain; version=0.0.4; charset=utf-8"
    }

    /// Encodes the registry into a response body.
    #[must_use]
    pub fn into_response(self) -> MetricsResponse {
        MetricsResponse {
            body: self.encode(),
            content_type: Self::content_type().to_string(),
        }
    }
}

/// Encoded scrape output.
#[derive(Debug, Clone)]
pub struct MetricsResponse {
    /// The response body in Prometheus text format.
    pub body: String,
    /// The Content-Type header value.
    pub content_type: String,
}

impl MetricsResponse {
    /// Writes the response body to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(self.body.as_bytes())
    }
}

/// Escapes a label value for the text format: backslash, `"` and newline.
#[must_use]
pub fn escape_label_value(value: &str) -> Cow<'_, str> {
    if !value.contains(['\\', '"', '\n']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// Finds the value of a sample line in encoded output.
///
/// `labels` is the encoded label block without braces, e.g. `id="abcd-1234"`;
/// pass an empty string for an unlabelled sample.
#[must_use]
pub fn find_sample(output: &str, name: &str, labels: &str) -> Option<f64> {
    let prefix = if labels.is_empty() {
        format!("{name} ")
    } else {
        format!("{name}{{{labels}}} ")
    };
    output
        .lines()
        .find_map(|line| line.strip_prefix(&prefix))
        .and_then(|value| value.trim().parse().ok())
}

/// Counts the sample lines of a metric in encoded output.
#[must_use]
pub fn count_samples(output: &str, name: &str) -> usize {
    output
        .lines()
        .filter(|line| !line.starts_with('#'))
        .filter(|line| {
            line.strip_prefix(name)
                .is_some_and(|rest| rest.starts_with('{') || rest.starts_with(' '))
        })
        .count()
}
