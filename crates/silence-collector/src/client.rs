//! Alertmanager API client.
//!
//! [`SilenceSource`] is the only capability the collector needs. It is
//! implemented by [`AlertmanagerClient`], which talks to the v2 REST API, and by
//! [`FakeSilenceSource`] for tests.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;
use url::Url;

use crate::error::{Result, SilenceError};
use crate::types::GettableSilence;

/// Path segments of the v2 API below the configured base URL.
pub const API_PATH: [&str; 2] = ["api", "v2"];

/// Header selecting the tenant on multi-tenant Alertmanager deployments.
pub const TENANT_HEADER: &str = "X-Scope-OrgID";

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str =
    concat!("alertmanager-silences-exporter/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of silences.
///
/// `tenant` selects the tenant to list silences for; `None` means the request
/// is not tenant-scoped.
pub trait SilenceSource: Send + Sync {
    /// Lists all silences visible to the given tenant.
    ///
    /// # Errors
    ///
    /// Returns a collection-scope [`SilenceError`] if the silences cannot be
    /// fetched or decoded.
    fn list_silences(
        &self,
        tenant: Option<&str>,
    ) -> impl Future<Output = Result<Vec<GettableSilence>>> + Send;
}

impl<S: SilenceSource> SilenceSource for Arc<S> {
    fn list_silences(
        &self,
        tenant: Option<&str>,
    ) -> impl Future<Output = Result<Vec<GettableSilence>>> + Send {
        (**self).list_silences(tenant)
    }
}

/// HTTP basic credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

impl BasicAuth {
    /// Returns credentials only when both parts are non-empty.
    #[must_use]
    pub fn from_parts(username: &str, password: &str) -> Option<Self> {
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Settings for [`AlertmanagerClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of Alertmanager, e.g. `http://localhost:9093/`.
    pub base_url: String,
    /// Credentials sent with every request.
    pub basic_auth: Option<BasicAuth>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent header value.
    pub user_agent: String,
}

impl ClientConfig {
    /// Creates a configuration with default timeout and no credentials.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            basic_auth: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Sets the basic credentials.
    #[must_use]
    pub fn with_basic_auth(mut self, auth: Option<BasicAuth>) -> Self {
        self.basic_auth = auth;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Builds an API URL by appending `api/v2` and `segments` to `base`.
///
/// # Errors
///
/// Returns [`SilenceError::InvalidUrl`] if `base` is not an absolute http(s) URL.
pub fn construct_url(base: &str, segments: &[&str]) -> Result<Url> {
    let invalid = |reason: String| SilenceError::InvalidUrl {
        url: base.to_string(),
        reason,
    };

    let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }

    url.path_segments_mut()
        .map_err(|()| invalid("cannot be a base URL".to_string()))?
        .pop_if_empty()
        .extend(API_PATH)
        .extend(segments);

    Ok(url)
}

/// Returns `url` with any username and password removed.
#[must_use]
pub fn without_userinfo(mut url: Url) -> Url {
    // Both setters only fail for URLs that cannot carry credentials.
    let _ = url.set_password(None);
    let _ = url.set_username("");
    url
}

/// Client for the Alertmanager v2 API.
///
/// The underlying connection pool is shared between tenants; the tenant is
/// chosen per request.
#[derive(Debug, Clone)]
pub struct AlertmanagerClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl AlertmanagerClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns [`SilenceError::Request`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { http, config })
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// URL of the silence list.
    ///
    /// # Errors
    ///
    /// Returns [`SilenceError::InvalidUrl`] if the base URL is unusable.
    pub fn silences_url(&self) -> Result<Url> {
        construct_url(&self.config.base_url, &["silences"])
    }

    async fn get_json(&self, url: Url, tenant: Option<&str>) -> Result<Vec<GettableSilence>> {
        let mut request = self
            .http
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");

        if let Some(auth) = &self.config.basic_auth {
            request = request.basic_auth(&auth.username, Some(&auth.password));
        }
        if let Some(tenant) = tenant {
            request = request.header(TENANT_HEADER, tenant);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(SilenceError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let silences: Vec<GettableSilence> = serde_json::from_slice(&body)?;
        debug!(url = %without_userinfo(url), tenant = tenant.unwrap_or_default(), count = silences.len(), "fetched silences");
        Ok(silences)
    }
}

impl SilenceSource for AlertmanagerClient {
    async fn list_silences(&self, tenant: Option<&str>) -> Result<Vec<GettableSilence>> {
        let url = self.silences_url()?;
        self.get_json(url, tenant.filter(|t| !t.is_empty())).await
    }
}

/// In-memory [`SilenceSource`] with canned per-tenant responses.
///
/// Tenants without a canned response get an empty list.
#[derive(Debug, Default)]
pub struct FakeSilenceSource {
    responses: HashMap<String, Result<Vec<GettableSilence>>>,
    calls: Mutex<Vec<Option<String>>>,
}

impl FakeSilenceSource {
    /// Creates a source that returns no silences.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `silences` for `tenant` (`None` for unscoped requests).
    #[must_use]
    pub fn with_silences(mut self, tenant: Option<&str>, silences: Vec<GettableSilence>) -> Self {
        self.responses
            .insert(tenant.unwrap_or_default().to_string(), Ok(silences));
        self
    }

    /// Fails requests for `tenant` with `error`.
    #[must_use]
    pub fn with_error(mut self, tenant: Option<&str>, error: SilenceError) -> Self {
        self.responses
            .insert(tenant.unwrap_or_default().to_string(), Err(error));
        self
    }

    /// Tenants requested so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Option<String>> {
        self.calls.lock().clone()
    }
}

impl SilenceSource for FakeSilenceSource {
    async fn list_silences(&self, tenant: Option<&str>) -> Result<Vec<GettableSilence>> {
        self.calls.lock().push(tenant.map(str::to_string));
        self.responses
            .get(tenant.unwrap_or_default())
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
