//! Wire model of the Alertmanager v2 silence list.
//!
//! Every field is optional: Alertmanager owns the schema and this crate only
//! decides which absences matter when a silence is normalized. Timestamps are
//! kept as the raw strings so a bad value only costs the affected sample.

use std::fmt;

use serde::{Deserialize, Serialize};

/// State of a silence as reported by Alertmanager.
///
/// States this exporter does not know keep their wire spelling in
/// [`SilenceState::Unknown`] and count as non-active.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SilenceState {
    /// Scheduled to start in the future.
    Pending,
    /// Currently suppressing alerts.
    Active,
    /// Past its end time.
    Expired,
    /// Any other state, as sent by Alertmanager.
    Unknown(String),
}

impl SilenceState {
    /// Returns the state as Alertmanager spells it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Unknown(raw) => raw,
        }
    }

    /// Returns true for [`SilenceState::Active`].
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl From<String> for SilenceState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => Self::Pending,
            "active" => Self::Active,
            "expired" => Self::Expired,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<SilenceState> for String {
    fn from(state: SilenceState) -> Self {
        match state {
            SilenceState::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SilenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status block of a silence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SilenceStatus {
    /// Current state.
    #[serde(default)]
    pub state: Option<SilenceState>,
}

/// A label matcher selecting the alerts a silence applies to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matcher {
    /// Label name.
    #[serde(default)]
    pub name: Option<String>,
    /// Label value or pattern.
    #[serde(default)]
    pub value: Option<String>,
    /// Whether `value` is a regular expression.
    #[serde(default)]
    pub is_regex: Option<bool>,
    /// Whether the matcher is an equality (`true`) or negation (`false`).
    #[serde(default)]
    pub is_equal: Option<bool>,
}

impl Matcher {
    /// Creates an equality matcher.
    #[must_use]
    pub fn equal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
            is_regex: Some(false),
            is_equal: None,
        }
    }
}

/// A silence as returned by `GET /api/v2/silences`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GettableSilence {
    /// Silence identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Current status.
    #[serde(default)]
    pub status: Option<SilenceStatus>,
    /// Last update time, RFC 3339.
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Free-form comment.
    #[serde(default)]
    pub comment: Option<String>,
    /// Author of the silence.
    #[serde(default)]
    pub created_by: Option<String>,
    /// Start time, RFC 3339.
    #[serde(default)]
    pub starts_at: Option<String>,
    /// End time, RFC 3339.
    #[serde(default)]
    pub ends_at: Option<String>,
    /// Matchers in the order Alertmanager returned them.
    #[serde(default)]
    pub matchers: Vec<Matcher>,
}

impl GettableSilence {
    /// Returns the state, if the status block carries one.
    #[must_use]
    pub fn state(&self) -> Option<SilenceState> {
        self.status.as_ref().and_then(|s| s.state.clone())
    }
}
