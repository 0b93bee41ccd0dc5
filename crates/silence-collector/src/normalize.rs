//! Flattening of a raw silence into a Prometheus label set.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, SilenceError};
use crate::types::{GettableSilence, SilenceState};

/// Label carrying the silence identifier.
pub const LABEL_ID: &str = "id";
/// Label carrying the silence comment.
pub const LABEL_COMMENT: &str = "comment";
/// Label carrying the silence author.
pub const LABEL_CREATED_BY: &str = "createdBy";
/// Label carrying the silence state.
pub const LABEL_STATUS: &str = "status";
/// Label carrying the tenant, present only for tenant-scoped fetches.
pub const LABEL_TENANT: &str = "tenant";
/// Prefix put in front of every matcher name.
pub const MATCHER_PREFIX: &str = "matcher_";

const UNKNOWN_ID: &str = "<unknown>";

static INVALID_LABEL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_]").unwrap_or_else(|_| unreachable!()));

/// A silence reduced to what the exporter publishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSilence {
    id: String,
    status: SilenceState,
    tenant: Option<String>,
    labels: BTreeMap<String, String>,
    starts_at: Option<String>,
    ends_at: Option<String>,
}

impl NormalizedSilence {
    /// Silence identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Silence state, used for filtering and for the info sample value.
    #[must_use]
    pub const fn status(&self) -> &SilenceState {
        &self.status
    }

    /// Tenant the silence was fetched for, if any.
    #[must_use]
    pub fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }

    /// Full label map: reserved keys, optional tenant, one entry per matcher.
    #[must_use]
    pub const fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    /// Raw `startsAt` value.
    #[must_use]
    pub fn starts_at(&self) -> Option<&str> {
        self.starts_at.as_deref()
    }

    /// Raw `endsAt` value.
    #[must_use]
    pub fn ends_at(&self) -> Option<&str> {
        self.ends_at.as_deref()
    }
}

/// Builds the label name for a matcher.
///
/// Characters that are not valid in a Prometheus label name become `_`.
#[must_use]
pub fn matcher_label_name(name: &str) -> String {
    format!("{MATCHER_PREFIX}{}", INVALID_LABEL_CHARS.replace_all(name, "_"))
}

/// Converts a raw silence into its label view.
///
/// `tenant` is the tenant the silence was fetched for; an empty string means
/// the fetch was not tenant-scoped and no `tenant` label is added. Matchers are
/// applied in order, so a later matcher whose label name collides with an
/// earlier one wins.
///
/// # Errors
///
/// Returns [`SilenceError::MalformedSilence`] if the id, comment, author,
/// state or any matcher name/value is missing.
pub fn normalize(raw: &GettableSilence, tenant: &str) -> Result<NormalizedSilence> {
    let id = required(raw.id.as_deref(), "id", UNKNOWN_ID)?;
    let comment = required(raw.comment.as_deref(), "comment", id)?;
    let created_by = required(raw.created_by.as_deref(), "createdBy", id)?;
    let status = raw.state().ok_or_else(|| malformed("status.state", id))?;

    let mut labels = BTreeMap::new();
    labels.insert(LABEL_ID.to_string(), id.to_string());
    labels.insert(LABEL_COMMENT.to_string(), comment.to_string());
    labels.insert(LABEL_CREATED_BY.to_string(), created_by.to_string());
    labels.insert(LABEL_STATUS.to_string(), status.as_str().to_string());

    let tenant = (!tenant.is_empty()).then(|| tenant.to_string());
    if let Some(tenant) = &tenant {
        labels.insert(LABEL_TENANT.to_string(), tenant.clone());
    }

    for matcher in &raw.matchers {
        let name = required(matcher.name.as_deref(), "matchers.name", id)?;
        let value = required(matcher.value.as_deref(), "matchers.value", id)?;
        labels.insert(matcher_label_name(name), value.to_string());
    }

    Ok(NormalizedSilence {
        id: id.to_string(),
        status,
        tenant,
        labels,
        starts_at: raw.starts_at.clone(),
        ends_at: raw.ends_at.clone(),
    })
}

fn required<'a>(value: Option<&'a str>, field: &'static str, silence_id: &str) -> Result<&'a str> {
    value.ok_or_else(|| malformed(field, silence_id))
}

fn malformed(field: &'static str, silence_id: &str) -> SilenceError {
    SilenceError::MalformedSilence {
        field,
        silence_id: silence_id.to_string(),
    }
}
