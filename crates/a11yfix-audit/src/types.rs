//! Audit service wire types.
//!
//! The service returns bare JSON arrays for every listing endpoint; fields
//! beyond the ones modeled here vary by audit type and are ignored.

use serde::Deserialize;

/// A site registered with the audit service.
#[derive(Debug, Clone, Deserialize)]
pub struct Site {
    pub id: String,
    #[serde(rename = "baseURL", default)]
    pub base_url: String,
}

/// An audit-service grouping of suggestions for one site.
#[derive(Debug, Clone, Deserialize)]
pub struct Opportunity {
    pub id: String,
    /// Audit category, e.g. `"generic-opportunity"` or something
    /// containing `accessibility`. Missing on some legacy records.
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// One raw suggestion record, as returned by the suggestions endpoint.
///
/// Historical records store the same concepts under several key names and
/// shapes inside `data`, so `data` stays an opaque JSON value and the
/// normalizer owns the precedence rules. Any field may be missing.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSuggestion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}
