use crate::app_config::AppConfig;
use crate::ConfigError;

/// Default base URL of the hosted audit service.
pub const DEFAULT_API_BASE: &str = "https://spacecat.experiencecloud.live/api/ci";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.is_empty()) };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let ims_org_id = require("AUDIT_IMS_ORG_ID")?;
    let sqs_queue_url = require("SQS_QUEUE_URL")?;
    let repo_path = PathBuf::from(require("REPO_PATH")?);

    let session_token = optional("AUDIT_SESSION_TOKEN");
    let api_key = optional("AUDIT_API_KEY");
    // A session token is preferred; the legacy API key is accepted, but at
    // least one of the two must be present before any network work starts.
    if session_token.is_none() && api_key.is_none() {
        return Err(ConfigError::MissingEnvVar("AUDIT_SESSION_TOKEN".to_string()));
    }

    let api_base = or_default("AUDIT_API_BASE", DEFAULT_API_BASE);
    let s3_bucket = or_default("S3_BUCKET_NAME", "spacecat-dev-mystique-assets");
    let aws_region = or_default("AWS_REGION", "us-east-1");
    let archive_name = optional("ARCHIVE_NAME");
    let request_timeout_secs = parse_u64("A11YFIX_REQUEST_TIMEOUT_SECS", "30")?;
    let log_level = or_default("A11YFIX_LOG_LEVEL", "info");

    Ok(AppConfig {
        api_base,
        session_token,
        api_key,
        ims_org_id,
        s3_bucket,
        sqs_queue_url,
        aws_region,
        repo_path,
        archive_name,
        request_timeout_secs,
        log_level,
    })
}
