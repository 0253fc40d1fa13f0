//! HTTP client for the hosted audit service REST API.
//!
//! Wraps `reqwest` with the org-id header, bearer-token or legacy API-key
//! auth, and typed response deserialization. Every listing endpoint
//! returns a bare JSON array.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::AuditError;
use crate::types::{Opportunity, RawSuggestion, Site};

/// How requests authenticate against the audit service. A session token
/// is preferred; the API key is a legacy scheme kept for older setups.
#[derive(Debug, Clone)]
pub enum Auth {
    Session(String),
    ApiKey(String),
}

/// Client for the audit service REST API.
///
/// Use [`AuditClient::new`] for production or point `base_url` at a mock
/// server in tests.
pub struct AuditClient {
    client: Client,
    base_url: Url,
    ims_org_id: String,
    auth: Auth,
}

impl AuditClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`AuditError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(
        base_url: &str,
        ims_org_id: &str,
        auth: Auth,
        timeout_secs: u64,
    ) -> Result<Self, AuditError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("a11yfix/0.1 (accessibility-remediation)")
            .build()?;

        // Normalise: exactly one trailing slash so that join() appends to
        // the last path segment instead of replacing it.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|_| AuditError::InvalidBaseUrl(base_url.to_string()))?;

        Ok(Self {
            client,
            base_url,
            ims_org_id: ims_org_id.to_owned(),
            auth,
        })
    }

    /// Fetches every site registered with the service.
    ///
    /// # Errors
    ///
    /// - [`AuditError::Http`] on network failure or non-2xx HTTP status.
    /// - [`AuditError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn list_sites(&self) -> Result<Vec<Site>, AuditError> {
        self.get_json("sites").await
    }

    /// Fetches the opportunities recorded for a site.
    ///
    /// # Errors
    ///
    /// Same contract as [`AuditClient::list_sites`].
    pub async fn list_opportunities(&self, site_id: &str) -> Result<Vec<Opportunity>, AuditError> {
        self.get_json(&format!("sites/{site_id}/opportunities")).await
    }

    /// Fetches the raw suggestion records of one opportunity.
    ///
    /// # Errors
    ///
    /// Same contract as [`AuditClient::list_sites`].
    pub async fn list_suggestions(
        &self,
        site_id: &str,
        opportunity_id: &str,
    ) -> Result<Vec<RawSuggestion>, AuditError> {
        self.get_json(&format!(
            "sites/{site_id}/opportunities/{opportunity_id}/suggestions"
        ))
        .await
    }

    /// Sends an authenticated GET for `path` (relative to the base URL),
    /// asserts a 2xx status, and deserializes the body.
    async fn get_json<T>(&self, path: &str) -> Result<T, AuditError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = self
            .base_url
            .join(path)
            .map_err(|_| AuditError::InvalidBaseUrl(format!("{}{path}", self.base_url)))?;

        let mut request = self
            .client
            .get(url.clone())
            .header("x-gw-ims-org-id", &self.ims_org_id)
            .header("Content-Type", "application/json");
        request = match &self.auth {
            Auth::Session(token) => request.bearer_auth(token),
            Auth::ApiKey(key) => request.header("x-api-key", key),
        };

        let response = request.send().await?.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| AuditError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

/// Case-insensitive substring match of `name_filter` against each site's
/// `baseURL`, preserving the service's listing order.
#[must_use]
pub fn find_sites_by_name(sites: &[Site], name_filter: &str) -> Vec<Site> {
    let needle = name_filter.to_lowercase();
    sites
        .iter()
        .filter(|site| site.base_url.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
