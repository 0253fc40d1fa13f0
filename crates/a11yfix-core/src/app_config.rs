use std::path::PathBuf;

/// Application configuration, sourced from the environment.
///
/// Auth against the audit service uses `session_token` when present and
/// falls back to the legacy `api_key`; [`crate::config`] guarantees at
/// least one is set.
#[derive(Clone)]
pub struct AppConfig {
    pub api_base: String,
    pub session_token: Option<String>,
    pub api_key: Option<String>,
    pub ims_org_id: String,
    pub s3_bucket: String,
    pub sqs_queue_url: String,
    pub aws_region: String,
    pub repo_path: PathBuf,
    pub archive_name: Option<String>,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_base", &self.api_base)
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "[redacted]"),
            )
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("ims_org_id", &self.ims_org_id)
            .field("s3_bucket", &self.s3_bucket)
            .field("sqs_queue_url", &self.sqs_queue_url)
            .field("aws_region", &self.aws_region)
            .field("repo_path", &self.repo_path)
            .field("archive_name", &self.archive_name)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}
