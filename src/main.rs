mod logging;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use logging::{init_logging, LoggingOptions};
use map_publisher::{read_settings, Doc, Documents, Settings};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

const DEFAULT_LOG_FILE: &str = "publisher.log";

/// Map Publisher - decides which map documents to publish to, or remove from, a map server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (JSON)
    #[arg(short, long, env = "MAP_PUBLISHER_SETTINGS")]
    settings: Option<PathBuf>,

    /// Folder to search for map documents, overrides the settings
    #[arg(long, env = "MAP_PUBLISHER_ROOT")]
    root: Option<PathBuf>,

    /// Publish history file, overrides the settings
    #[arg(long, env = "MAP_PUBLISHER_HISTORY")]
    history: Option<PathBuf>,

    /// Map server URL, overrides the settings
    #[arg(long, env = "MAP_PUBLISHER_SERVER_URL")]
    server_url: Option<String>,

    /// Show informational messages on the console
    #[arg(short, long)]
    verbose: bool,

    /// Show debug messages on the console
    #[arg(long)]
    debug: bool,

    /// Detailed log file
    #[arg(long, env = "MAP_PUBLISHER_LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Do not write a log file
    #[arg(long)]
    no_log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the documents to publish and the services to unpublish
    Plan {
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record the documents on disk as the published history
    Record,
}

/// A document in the printed plan
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanItem {
    name: String,
    service_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service_url: Option<String>,
}

impl From<&Doc> for PlanItem {
    fn from(doc: &Doc) -> Self {
        Self {
            name: doc.name().to_string(),
            service_path: doc.service_path(),
            source_path: doc.source_path().map(PathBuf::from),
            service_url: doc.service_url(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Plan {
    publish: Vec<PlanItem>,
    unpublish: Vec<PlanItem>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingOptions {
        verbose: args.verbose,
        debug: args.debug,
        log_file: (!args.no_log_file).then_some(args.log_file.as_path()),
    })?;

    let settings = load_settings(&args).await?;

    match args.command {
        Command::Plan { json } => plan(args.root, settings, json).await,
        Command::Record => record(args.root, settings).await,
    }
}

/// The settings file with command line overrides applied
async fn load_settings(args: &Args) -> Result<Option<Settings>> {
    let mut settings = match &args.settings {
        Some(path) => Some(
            read_settings(path)
                .await
                .with_context(|| format!("Failed to read settings from {}", path.display()))?,
        ),
        None => None,
    };

    if args.history.is_some() || args.server_url.is_some() {
        let settings = settings.get_or_insert_with(Settings::default);
        if let Some(history) = &args.history {
            settings.history_file = Some(history.clone());
        }
        if let Some(server_url) = &args.server_url {
            settings.server_url = Some(server_url.clone());
        }
    }

    Ok(settings)
}

async fn plan(root: Option<PathBuf>, settings: Option<Settings>, json: bool) -> Result<()> {
    let documents = Documents::new(root, None, settings).await?;

    let plan = Plan {
        publish: documents.items_to_publish().iter().map(PlanItem::from).collect(),
        unpublish: documents
            .items_to_unpublish()
            .iter()
            .map(PlanItem::from)
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!("Publish ({}):", plan.publish.len());
    for item in &plan.publish {
        match &item.source_path {
            Some(source) => println!("  {} <- {}", item.service_path, source.display()),
            None => println!("  {}", item.service_path),
        }
    }
    println!("Unpublish ({}):", plan.unpublish.len());
    for item in &plan.unpublish {
        println!("  {}", item.service_path);
    }

    Ok(())
}

async fn record(root: Option<PathBuf>, settings: Option<Settings>) -> Result<()> {
    let history_file = match settings.as_ref().and_then(|s| s.history_file.clone()) {
        Some(path) => path,
        None => bail!("No history file given (use --history or set historyFile in the settings)"),
    };

    // The existing history is replaced, so skip reading it
    let documents = Documents::new(root, Some(Vec::new()), settings).await?;

    let recorded = documents
        .record_history(&history_file)
        .await
        .with_context(|| format!("Failed to write history to {}", history_file.display()))?;
    match recorded {
        Some(count) => info!(
            "Recorded {} published documents in {}",
            count,
            history_file.display()
        ),
        None => bail!(
            "No documents found, history in {} left unchanged",
            history_file.display()
        ),
    }

    Ok(())
}
