//! Core engine for the a11yfix workflow.
//!
//! Owns the canonical [`Issue`] model and the pure logic that turns a flat
//! issue collection into bounded work-order batches: frequency-ranked
//! grouping, selection-mode resolution, batch expansion, and work-order
//! rendering. No I/O happens in this crate; interactive choice is injected
//! through the [`select::Chooser`] trait.

use thiserror::Error;

pub mod app_config;
pub mod batch;
pub mod config;
pub mod group;
pub mod issue;
pub mod message;
pub mod select;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use issue::Issue;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
