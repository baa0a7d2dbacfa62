use anyhow::Context;
use clap::Parser;
use timelog::{AdoWorkItemSource, WorkItemReconciler};

#[derive(Parser)]
#[command(name = "timelog-cli", about = "Fetch iteration time log records from Azure DevOps")]
struct Opts {
    /// The iteration path to load, e.g. "Fabrikam\Sprint 3"
    iteration_path: String,
    /// Team project name; defaults to $ADO_PROJECT
    #[arg(long)]
    project: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename(".env.local").ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();

    let organization =
        std::env::var("ADO_ORGANIZATION").context("ADO_ORGANIZATION must be set")?;
    let project = match opts.project {
        Some(project) => project,
        None => std::env::var("ADO_PROJECT").context("ADO_PROJECT must be set")?,
    };
    let token = std::env::var("ADO_TOKEN").context("ADO_TOKEN must be set")?;

    let client = az_wit::WitClient::connect(&organization, &project, &token)
        .await
        .context("failed to connect to Azure DevOps")?;

    let reconciler = WorkItemReconciler::new(AdoWorkItemSource::new(client));
    let records = reconciler.load_data(&opts.iteration_path, &project).await?;

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
