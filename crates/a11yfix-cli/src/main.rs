use clap::{ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

mod chooser;
mod run;

#[derive(Debug, Parser)]
#[command(name = "a11yfix")]
#[command(about = "Send accessibility remediation work orders for audit suggestions")]
#[command(group(ArgGroup::new("site").required(true).args(["name", "site_id"])))]
struct Cli {
    /// Case-insensitive substring matched against site base URLs.
    #[arg(long)]
    name: Option<String>,

    /// Site id, skipping the name lookup.
    #[arg(long)]
    site_id: Option<String>,

    /// Restrict the run to one opportunity instead of scanning the site.
    #[arg(long)]
    opportunity_id: Option<String>,

    /// Send one specific suggestion.
    #[arg(long, requires = "opportunity_id")]
    suggestion_id: Option<String>,

    /// Send specific suggestions; ids may be space- or comma-separated.
    #[arg(long, num_args = 1.., requires = "opportunity_id")]
    suggestion_ids: Vec<String>,

    /// Send every issue sharing the selected issue's aggregation key.
    #[arg(long)]
    send_all_issues: bool,

    /// Pick an issue type and send one work order per aggregation key.
    #[arg(long)]
    send_by_issue_type: bool,

    /// Pick an aggregation key and send every issue under it.
    #[arg(long)]
    send_by_aggregation_key: bool,

    /// Use the named archive already in the bucket instead of auto-detecting.
    #[arg(long, conflicts_with = "force_upload")]
    archive: Option<String>,

    /// Build and upload a fresh archive even when one already exists.
    #[arg(long)]
    force_upload: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = a11yfix_core::load_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let mut chooser = chooser::TerminalChooser;
    match run::run(&cli, &config, &mut chooser).await? {
        run::RunStatus::Sent(count) => {
            tracing::info!(count, "all work orders sent");
        }
        run::RunStatus::Cancelled => {
            println!("Cancelled.");
        }
    }
    Ok(())
}
