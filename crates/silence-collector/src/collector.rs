//! Per-scrape collection of silence samples.
//!
//! One call to [`SilenceCollector::collect`] walks the configured tenants in
//! order (or makes a single unscoped pass when none are configured), fetches
//! their silences, normalizes them, applies the inclusion policy and turns the
//! survivors into samples.
//!
//! A fetch failure for any pass discards everything gathered so far and the
//! scrape consists of a single collection-error sample. Per-silence problems
//! only drop the affected silence or sample.

use tracing::{debug, error, warn};

use crate::client::SilenceSource;
use crate::emission::{MetricSample, collection_error, emit};
use crate::error::SilenceError;
use crate::exposition::SilenceRegistry;
use crate::normalize::normalize;

/// What to collect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectorSettings {
    /// Tenants to fetch, in order. Empty means one unscoped fetch.
    pub tenants: Vec<String>,
    /// Export pending and expired silences too, not only active ones.
    pub include_non_active: bool,
}

impl CollectorSettings {
    /// Creates settings for an unscoped, active-only collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tenants to fetch.
    #[must_use]
    pub fn with_tenants<I, T>(mut self, tenants: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tenants = tenants.into_iter().map(Into::into).collect();
        self
    }

    /// Sets whether non-active silences are exported.
    #[must_use]
    pub const fn with_include_non_active(mut self, include: bool) -> Self {
        self.include_non_active = include;
        self
    }
}

/// How a scrape ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    /// Every pass was fetched.
    Completed {
        /// Number of fetch passes made.
        passes: usize,
        /// Silences exported.
        exported: usize,
        /// Silences left out by the inclusion policy.
        filtered: usize,
        /// Malformed silences dropped.
        skipped: usize,
    },
    /// A pass could not be fetched and the scrape was abandoned.
    Failed {
        /// Tenant of the failed pass, `None` for the unscoped pass.
        tenant: Option<String>,
        /// The fetch error.
        error: SilenceError,
    },
}

/// Result of one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Scrape {
    /// Samples to expose.
    pub samples: Vec<MetricSample>,
    /// Summary of the run.
    pub outcome: ScrapeOutcome,
}

impl Scrape {
    /// Returns true if the scrape was abandoned.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.outcome, ScrapeOutcome::Failed { .. })
    }

    /// Records the samples into a fresh registry.
    #[must_use]
    pub fn into_registry(self) -> SilenceRegistry {
        SilenceRegistry::from_samples(&self.samples)
    }
}

/// Collects silence samples from a [`SilenceSource`].
///
/// Holds no mutable state, so one instance can serve overlapping scrapes.
#[derive(Debug)]
pub struct SilenceCollector<S> {
    source: S,
    settings: CollectorSettings,
}

impl<S: SilenceSource> SilenceCollector<S> {
    /// Creates a collector.
    #[must_use]
    pub const fn new(source: S, settings: CollectorSettings) -> Self {
        Self { source, settings }
    }

    /// Returns the silence source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Returns the settings.
    #[must_use]
    pub const fn settings(&self) -> &CollectorSettings {
        &self.settings
    }

    /// Runs one collection.
    pub async fn collect(&self) -> Scrape {
        let passes: Vec<Option<&str>> = if self.settings.tenants.is_empty() {
            vec![None]
        } else {
            self.settings.tenants.iter().map(|t| Some(t.as_str())).collect()
        };

        let mut samples = Vec::new();
        let (mut exported, mut filtered, mut skipped) = (0, 0, 0);

        for &tenant in &passes {
            debug!(tenant = tenant.unwrap_or_default(), "fetching silences");

            let silences = match self.source.list_silences(tenant).await {
                Ok(silences) => silences,
                Err(err) => {
                    error!(
                        tenant = tenant.unwrap_or_default(),
                        error = %err,
                        "silence collection failed, discarding scrape"
                    );
                    return Scrape {
                        samples: vec![collection_error(&err, tenant)],
                        outcome: ScrapeOutcome::Failed {
                            tenant: tenant.map(str::to_string),
                            error: err,
                        },
                    };
                }
            };

            for raw in &silences {
                let silence = match normalize(raw, tenant.unwrap_or_default()) {
                    Ok(silence) => silence,
                    Err(err) => {
                        warn!(tenant = tenant.unwrap_or_default(), error = %err, "skipping silence");
                        skipped += 1;
                        continue;
                    }
                };

                if !self.settings.include_non_active && !silence.status().is_active() {
                    filtered += 1;
                    continue;
                }

                samples.extend(emit(&silence));
                exported += 1;
            }
        }

        debug!(
            passes = passes.len(),
            exported, filtered, skipped, "silence collection finished"
        );

        Scrape {
            samples,
            outcome: ScrapeOutcome::Completed {
                passes: passes.len(),
                exported,
                filtered,
                skipped,
            },
        }
    }
}
