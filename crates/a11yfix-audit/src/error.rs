use thiserror::Error;

/// Errors returned by the audit service client.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Network or TLS failure from the underlying HTTP client, or a
    /// non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL is not a valid URL.
    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}
