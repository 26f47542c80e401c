//! Maps each subcommand onto a toolkit operation and returns its JSON response.

use pagesense_core::AppConfig;
use pagesense_db::PoolConfig;
use pagesense_pipeline::Toolkit;
use serde::Serialize;
use serde_json::{json, Value};

use crate::{Commands, DbCommands};

pub(crate) async fn execute(command: Commands, config: &AppConfig) -> anyhow::Result<Value> {
    match command {
        Commands::Scrape { url } => to_value(&open(config).await?.scrape_and_analyze(&url).await),
        Commands::Batch { urls } => to_value(&open(config).await?.batch_analyze_urls(&urls).await),
        Commands::History { limit } => {
            to_value(&open(config).await?.get_analysis_history(Some(limit)).await)
        }
        Commands::Search { label } => {
            to_value(&open(config).await?.search_by_sentiment(&label).await)
        }
        Commands::Keywords { min_frequency } => to_value(
            &open(config)
                .await?
                .get_keyword_analysis(Some(min_frequency))
                .await,
        ),
        Commands::Report => to_value(&open(config).await?.generate_summary_report().await),
        Commands::Feed { url, max_items } => to_value(
            &open(config)
                .await?
                .analyze_rss_feed(&url, Some(max_items))
                .await,
        ),
        Commands::Links { url, base } => to_value(
            &open(config)
                .await?
                .extract_links(&url, base.as_deref())
                .await,
        ),
        Commands::Db { command } => run_db_command(command, config).await,
    }
}

async fn open(config: &AppConfig) -> anyhow::Result<Toolkit> {
    let toolkit = Toolkit::from_config(config).await?;
    tracing::debug!(database = %config.database_path.display(), "toolkit ready");
    Ok(toolkit)
}

async fn run_db_command(command: DbCommands, config: &AppConfig) -> anyhow::Result<Value> {
    let pool_config = PoolConfig::from_app_config(config);
    let pool = pagesense_db::connect_pool(&config.database_path, pool_config).await?;

    let response = match command {
        DbCommands::Migrate => {
            let applied = pagesense_db::run_migrations(&pool).await?;
            tracing::info!(applied, "migrations complete");
            json!({ "success": true, "applied": applied })
        }
        DbCommands::Ping => {
            pagesense_db::ping(&pool).await?;
            json!({
                "success": true,
                "database_path": config.database_path.display().to_string(),
            })
        }
    };
    pool.close().await;
    Ok(response)
}

fn to_value<T: Serialize>(response: &T) -> anyhow::Result<Value> {
    Ok(serde_json::to_value(response)?)
}
