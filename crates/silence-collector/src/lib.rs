//! Alertmanager silences as Prometheus gauges.
#![forbid(unsafe_code)]
//!
//! `silence-collector` fetches silences from one or more Alertmanager tenants
//! and turns each of them into gauge samples: an info sample carrying the
//! silence metadata and matchers as labels, plus start and end timestamps.
//!
//! # Pipeline
//!
//! - **Client**: [`AlertmanagerClient`] lists silences over the v2 REST API
//! - **Normalize**: [`normalize`] flattens a silence into a label map
//! - **Emission**: [`emit`] derives the samples for one silence
//! - **Collector**: [`SilenceCollector`] runs the above for every tenant
//! - **Exposition**: [`SilenceRegistry`] encodes samples in Prometheus text format
//!
//! # Example
//!
//! ```rust
//! use silence_collector::{CollectorSettings, FakeSilenceSource, SilenceCollector};
//!
//! let source = FakeSilenceSource::new();
//! let collector = SilenceCollector::new(source, CollectorSettings::new().with_tenants(["team-a"]));
//! assert_eq!(collector.settings().tenants, vec!["team-a".to_string()]);
//! ```

#![doc(html_root_url = "https://docs.rs/silence-collector/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod collector;
pub mod emission;
pub mod error;
pub mod exposition;
pub mod normalize;
pub mod types;

// Re-export main types at crate root
pub use client::{
    AlertmanagerClient, BasicAuth, ClientConfig, FakeSilenceSource, SilenceSource, without_userinfo,
};
pub use collector::{CollectorSettings, Scrape, ScrapeOutcome, SilenceCollector};
pub use emission::{MetricKind, MetricSample, collection_error, emit};
pub use error::{Result, SilenceError};
pub use exposition::{MetricsResponse, SilenceRegistry};
pub use normalize::{NormalizedSilence, normalize};
pub use types::{GettableSilence, Matcher, SilenceState, SilenceStatus};
