mod commands;

use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use pagesense_pipeline::{DEFAULT_FEED_MAX_ITEMS, DEFAULT_HISTORY_LIMIT, DEFAULT_MIN_FREQUENCY};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pagesense")]
#[command(about = "Fetch web pages, score their sentiment and keywords, and query the results")]
struct Cli {
    /// Pretty-print the JSON response
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch and analyze a single URL
    Scrape { url: String },
    /// Analyze several URLs one after another
    Batch {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Show the most recent analyses
    History {
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: u32,
    },
    /// List analyses with a given sentiment label (positive, negative, neutral)
    Search { label: String },
    /// Rank keywords across every stored analysis
    Keywords {
        #[arg(long, default_value_t = DEFAULT_MIN_FREQUENCY)]
        min_frequency: f64,
    },
    /// Generate and store a summary report
    Report,
    /// Analyze the linked entries of an RSS or Atom feed
    Feed {
        url: String,
        #[arg(long, default_value_t = DEFAULT_FEED_MAX_ITEMS)]
        max_items: usize,
    },
    /// List the absolute links on a page
    Links {
        url: String,
        /// Resolve relative links against this URL instead of the page URL
        #[arg(long)]
        base: Option<String>,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Apply pending schema migrations
    Migrate,
    /// Check that the database can be opened and queried
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let config = pagesense_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let response = commands::execute(command, &config).await?;
    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{rendered}");

    if response.get("success").and_then(serde_json::Value::as_bool) == Some(false) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
