//! Error types for the silence-collector crate.

use thiserror::Error;

/// Errors that can occur while fetching and converting silences.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SilenceError {
    /// The configured Alertmanager URL cannot be used as a request base.
    #[error("invalid Alertmanager URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL as configured.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The request never produced a response (connect, TLS or timeout failure).
    #[error("request to Alertmanager failed: {0}")]
    Request(String),

    /// Alertmanager answered with an error status.
    #[error("Alertmanager returned an HTTP error code: {status}")]
    Http {
        /// The HTTP status code.
        status: u16,
    },

    /// The response body is not a valid silence list.
    #[error("unable to decode silences: {0}")]
    Decode(String),

    /// A silence is missing a field every silence must carry.
    #[error("malformed silence {silence_id}: missing {field}")]
    MalformedSilence {
        /// The missing field, named as on the wire.
        field: &'static str,
        /// Identifier of the silence, `<unknown>` when the id itself is missing.
        silence_id: String,
    },

    /// A silence timestamp is not RFC 3339.
    #[error("invalid {field} timestamp '{value}': {reason}")]
    TimestampParse {
        /// The timestamp field, named as on the wire.
        field: &'static str,
        /// The raw value.
        value: String,
        /// Parser message.
        reason: String,
    },
}

impl SilenceError {
    /// Returns true if the error aborts a whole collection pass.
    ///
    /// Record and sample level errors only drop the affected silence or sample.
    #[must_use]
    pub const fn is_collection_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl { .. } | Self::Request(_) | Self::Http { .. } | Self::Decode(_)
        )
    }
}

impl From<reqwest::Error> for SilenceError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}

impl From<serde_json::Error> for SilenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type for silence operations.
pub type Result<T> = std::result::Result<T, SilenceError>;
