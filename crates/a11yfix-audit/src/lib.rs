//! Client for the hosted audit service and normalization of its raw
//! suggestion records into canonical [`a11yfix_core::Issue`] values.

mod client;
mod error;
mod normalize;
mod types;

pub use client::{find_sites_by_name, AuditClient, Auth};
pub use error::AuditError;
pub use normalize::{normalize_suggestion, normalize_suggestions};
pub use types::{Opportunity, RawSuggestion, Site};
