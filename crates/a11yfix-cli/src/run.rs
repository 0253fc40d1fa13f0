//! The end-to-end dispatch workflow: resolve the site, collect and
//! normalize suggestions, resolve the operator's selection into batches,
//! ensure a source snapshot exists, then confirm and send the work
//! orders.

use anyhow::{bail, Context};

use a11yfix_audit::{
    find_sites_by_name, normalize_suggestions, AuditClient, Auth, Opportunity, Site,
};
use a11yfix_core::batch::{expand_batches, MAX_BATCH_SIZE};
use a11yfix_core::message::{new_work_order, WorkOrder, WorkOrderContext};
use a11yfix_core::select::{resolve_selection, Chooser, SelectionError, SelectionMode};
use a11yfix_core::{AppConfig, Issue};
use a11yfix_dispatch::{ensure_snapshot, SnapshotPolicy, SnapshotStore, WorkQueue};

use crate::Cli;

/// How a run ended. Both variants are successful exits; failures travel
/// as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Sent(usize),
    Cancelled,
}

/// Runs the whole workflow for one invocation.
///
/// # Errors
///
/// Any failure other than operator cancellation: configuration or flag
/// problems, audit-service errors, packaging or delivery failures.
pub async fn run(
    cli: &Cli,
    config: &AppConfig,
    chooser: &mut dyn Chooser,
) -> anyhow::Result<RunStatus> {
    let (mode, send_mode) = SelectionMode::from_flags(
        cli.suggestion_id.as_deref(),
        &cli.suggestion_ids,
        cli.send_all_issues,
        cli.send_by_issue_type,
        cli.send_by_aggregation_key,
    )?;

    let auth = if let Some(token) = &config.session_token {
        Auth::Session(token.clone())
    } else if let Some(key) = &config.api_key {
        tracing::warn!("authenticating with the legacy API key \u{2014} prefer AUDIT_SESSION_TOKEN");
        Auth::ApiKey(key.clone())
    } else {
        bail!("no audit credentials configured");
    };
    let client = AuditClient::new(
        &config.api_base,
        &config.ims_org_id,
        auth,
        config.request_timeout_secs,
    )?;

    let site_id = match (&cli.site_id, &cli.name) {
        (Some(id), _) => {
            tracing::info!(site_id = %id, "using provided site id");
            id.clone()
        }
        (None, Some(name)) => {
            let sites = client.list_sites().await.context("listing sites")?;
            let matching = find_sites_by_name(&sites, name);
            match pick_site(&matching, name, chooser) {
                Ok(site) => {
                    tracing::info!(site_id = %site.id, base_url = %site.base_url, "found site");
                    site.id
                }
                Err(SelectionError::Cancelled) => return Ok(RunStatus::Cancelled),
                Err(err) => return Err(err.into()),
            }
        }
        (None, None) => bail!("one of --name or --site-id is required"),
    };

    let issues = gather_issues(&client, &site_id, cli.opportunity_id.as_deref()).await?;
    if issues.is_empty() {
        bail!("no suggestions with aggregation keys found");
    }
    tracing::info!(count = issues.len(), "collected issues");

    let selection = match resolve_selection(&issues, &mode, chooser) {
        Ok(selection) => selection,
        Err(SelectionError::Cancelled) => return Ok(RunStatus::Cancelled),
        Err(err) => return Err(err.into()),
    };
    let batches = expand_batches(&selection, &issues, send_mode, MAX_BATCH_SIZE)?;

    let sdk_config = a11yfix_dispatch::load_sdk_config(&config.aws_region).await;
    let store = SnapshotStore::from_sdk_config(&sdk_config, &config.s3_bucket);
    let policy = snapshot_policy(cli, config);
    let code_path = ensure_snapshot(&store, &config.repo_path, &policy).await?;

    let ctx = WorkOrderContext {
        site_id,
        code_bucket: config.s3_bucket.clone(),
        code_path,
    };
    let orders: Vec<WorkOrder> = batches.iter().map(|batch| new_work_order(batch, &ctx)).collect();
    for (n, order) in orders.iter().enumerate() {
        println!("\nWork order {}/{}:", n + 1, orders.len());
        println!("{}", serde_json::to_string_pretty(order)?);
    }

    if !confirm_send(orders.len(), chooser) {
        return Ok(RunStatus::Cancelled);
    }

    let queue = WorkQueue::from_sdk_config(&sdk_config, &config.sqs_queue_url);
    for (n, order) in orders.iter().enumerate() {
        let message_id = queue
            .send(order)
            .await
            .with_context(|| format!("sending work order {}/{}", n + 1, orders.len()))?;
        tracing::info!(
            message_id = %message_id,
            opportunity_id = %order.data.opportunity_id,
            "work order sent"
        );
        println!("Sent {}/{}: message id {}", n + 1, orders.len(), message_id);
    }
    println!("Code snapshot: s3://{}/{}", ctx.code_bucket, ctx.code_path);

    let mut opportunity_ids: Vec<&str> = orders
        .iter()
        .map(|order| order.data.opportunity_id.as_str())
        .collect();
    opportunity_ids.sort_unstable();
    opportunity_ids.dedup();
    println!("\nNext steps:");
    println!("  1. Watch the fix consumer logs for these opportunities:");
    for id in opportunity_ids {
        println!("       {id}");
    }
    println!("  2. Check the bucket for the generated diff");
    println!("  3. Verify the results on the audit opportunity");

    Ok(RunStatus::Sent(orders.len()))
}

/// Resolves a name-filter match list to exactly one site, prompting when
/// several sites match. At most ten matches are offered.
fn pick_site(
    matching: &[Site],
    name: &str,
    chooser: &mut dyn Chooser,
) -> Result<Site, SelectionError> {
    match matching {
        [] => Err(SelectionError::InvalidSelection(format!(
            "no sites match '{name}'"
        ))),
        [only] => Ok(only.clone()),
        many => {
            let shown = &many[..many.len().min(10)];
            let items: Vec<String> = shown
                .iter()
                .map(|site| format!("{} ({})", site.base_url, site.id))
                .collect();
            match chooser.choose("Select site", &items)? {
                Some(index) if index < shown.len() => Ok(shown[index].clone()),
                Some(index) => Err(SelectionError::InvalidSelection(format!(
                    "selection {} is out of range 1-{}",
                    index + 1,
                    shown.len()
                ))),
                None => Err(SelectionError::Cancelled),
            }
        }
    }
}

/// Collects the normalized working set for the run.
///
/// With an explicit opportunity id only that opportunity is fetched and
/// its issues are tagged `accessibility`. Otherwise every accessibility
/// opportunity of the site is scanned; a failing suggestions fetch skips
/// that opportunity instead of aborting the run.
async fn gather_issues(
    client: &AuditClient,
    site_id: &str,
    opportunity_id: Option<&str>,
) -> anyhow::Result<Vec<Issue>> {
    if let Some(opportunity_id) = opportunity_id {
        let raw = client
            .list_suggestions(site_id, opportunity_id)
            .await
            .context("listing suggestions")?;
        if raw.is_empty() {
            bail!("no suggestions found for opportunity {opportunity_id}");
        }
        return Ok(normalize_suggestions(&raw)
            .into_iter()
            .map(|issue| issue.with_opportunity(opportunity_id, "accessibility"))
            .collect());
    }

    let opportunities = client
        .list_opportunities(site_id)
        .await
        .context("listing opportunities")?;
    if opportunities.is_empty() {
        bail!("no opportunities found for site {site_id}");
    }
    let scoped = accessibility_opportunities(&opportunities);
    tracing::info!(
        total = opportunities.len(),
        scanned = scoped.len(),
        "scanning opportunities"
    );

    let mut issues = Vec::new();
    for opportunity in scoped {
        let raw = match client.list_suggestions(site_id, &opportunity.id).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(
                    opportunity_id = %opportunity.id,
                    error = %err,
                    "failed to fetch suggestions \u{2014} skipping opportunity"
                );
                continue;
            }
        };
        issues.extend(
            normalize_suggestions(&raw)
                .into_iter()
                .map(|issue| issue.with_opportunity(&opportunity.id, &opportunity.kind)),
        );
    }
    Ok(issues)
}

/// Keeps the opportunities whose type mentions accessibility. When none
/// do, every opportunity is scanned so legacy sites without typed
/// opportunities still work.
fn accessibility_opportunities(opportunities: &[Opportunity]) -> Vec<Opportunity> {
    let scoped: Vec<Opportunity> = opportunities
        .iter()
        .filter(|opportunity| opportunity.kind.to_lowercase().contains("accessibility"))
        .cloned()
        .collect();
    if scoped.is_empty() {
        tracing::warn!("no accessibility opportunities found, scanning all opportunities");
        opportunities.to_vec()
    } else {
        scoped
    }
}

/// Picks the snapshot policy for this run. `--force-upload` wins, then a
/// configured `ARCHIVE_NAME`, then `--archive`, then auto-detection.
fn snapshot_policy(cli: &Cli, config: &AppConfig) -> SnapshotPolicy {
    if cli.force_upload {
        SnapshotPolicy::ForceUpload
    } else if let Some(name) = config.archive_name.clone() {
        SnapshotPolicy::Named(name)
    } else if let Some(name) = cli.archive.clone() {
        SnapshotPolicy::Named(name)
    } else {
        SnapshotPolicy::Auto
    }
}

/// Final go/no-go prompt. Anything other than an explicit yes counts as
/// a decline.
fn confirm_send(count: usize, chooser: &mut dyn Chooser) -> bool {
    let prompt = if count == 1 {
        "Send this work order?".to_string()
    } else {
        format!("Send these {count} work orders?")
    };
    chooser.confirm(&prompt).unwrap_or(false)
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
