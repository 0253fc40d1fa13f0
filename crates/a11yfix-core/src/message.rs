//! Work-order documents handed to the downstream fix consumer.
//!
//! Field names and nesting are a compatibility contract with the consumer
//! and must not be renamed or reshaped.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::batch::MessageBatch;
use crate::issue::Issue;

/// Fixed message type recognized by the fix-automation consumer.
pub const WORK_ORDER_TYPE: &str = "guidance:accessibility-remediation";

/// The outgoing work-order message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkOrder {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "siteId")]
    pub site_id: String,
    #[serde(rename = "auditId")]
    pub audit_id: String,
    pub time: String,
    pub data: WorkOrderData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkOrderData {
    pub url: String,
    #[serde(rename = "opportunityId")]
    pub opportunity_id: String,
    #[serde(rename = "aggregationKey")]
    pub aggregation_key: String,
    #[serde(rename = "issuesList")]
    pub issues_list: Vec<IssueEntry>,
    #[serde(rename = "codeBucket")]
    pub code_bucket: String,
    #[serde(rename = "codePath")]
    pub code_path: String,
}

/// One entry of `issuesList`. Wire names are snake_case, unlike the
/// camelCase envelope \u{2014} the consumer expects exactly this mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueEntry {
    pub issue_name: String,
    pub issue_description: String,
    pub faulty_line: String,
    pub target_selector: String,
    pub suggestion_id: String,
}

/// Context shared by every work order in one run.
#[derive(Debug, Clone)]
pub struct WorkOrderContext {
    pub site_id: String,
    pub code_bucket: String,
    pub code_path: String,
}

/// Renders batch members into `issuesList` entries, preserving member
/// order. Empty descriptions fall back to a templated string; the other
/// optional fields stay empty strings, never absent.
#[must_use]
pub fn build_issues_list(members: &[Issue]) -> Vec<IssueEntry> {
    members
        .iter()
        .map(|issue| IssueEntry {
            issue_name: issue.issue_type.clone(),
            issue_description: if issue.issue_description.is_empty() {
                format!("Accessibility issue: {}", issue.issue_type)
            } else {
                issue.issue_description.clone()
            },
            faulty_line: issue.faulty_line.clone(),
            target_selector: issue.target_selector.clone(),
            suggestion_id: issue.id.clone(),
        })
        .collect()
}

/// Renders one batch into a work order with the caller-provided id and
/// timestamp, so output is byte-stable given fixed inputs.
#[must_use]
pub fn build_work_order(
    batch: &MessageBatch,
    ctx: &WorkOrderContext,
    audit_id: Uuid,
    time: DateTime<Utc>,
) -> WorkOrder {
    WorkOrder {
        kind: WORK_ORDER_TYPE.to_string(),
        site_id: ctx.site_id.clone(),
        audit_id: audit_id.to_string(),
        time: time.to_rfc3339_opts(SecondsFormat::Micros, false),
        data: WorkOrderData {
            url: batch.representative.url.clone(),
            opportunity_id: batch.representative.opportunity_id.clone(),
            aggregation_key: batch.representative.aggregation_key.clone(),
            issues_list: build_issues_list(&batch.members),
            code_bucket: ctx.code_bucket.clone(),
            code_path: ctx.code_path.clone(),
        },
    }
}

/// Renders one batch with a fresh v4 audit id and the current UTC time.
#[must_use]
pub fn new_work_order(batch: &MessageBatch, ctx: &WorkOrderContext) -> WorkOrder {
    build_work_order(batch, ctx, Uuid::new_v4(), Utc::now())
}
