use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod generate;
mod inspect;

#[derive(Debug, Parser)]
#[command(name = "feedgen")]
#[command(about = "Export product catalog feeds from an EAV commerce database")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write one feed file per category plus an index document
    Categories {
        /// Restrict the run to a single category entity id
        #[arg(long)]
        category: Option<u32>,

        /// Cap the number of products per category feed
        #[arg(long)]
        limit: Option<u32>,

        /// Output directory for category feeds and the index
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write a single flat feed containing every qualifying product
    Flat {
        /// Cap the number of products in the feed
        #[arg(long)]
        limit: Option<u32>,

        /// Output file for the flat feed
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Dump raw attribute rows for one product, looked up by SKU or URL key
    Inspect { term: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = feedgen_core::load_app_config_from_env()?;

    // CLI flags override env-derived settings.
    match &cli.command {
        Some(Commands::Categories { limit, out, .. }) => {
            if limit.is_some() {
                config.row_limit = *limit;
            }
            if let Some(dir) = out {
                config.output_dir.clone_from(dir);
            }
        }
        Some(Commands::Flat { limit, out }) => {
            if limit.is_some() {
                config.row_limit = *limit;
            }
            if out.is_some() {
                config.output_file.clone_from(out);
            }
        }
        _ => {}
    }

    let db_config = feedgen_db::DbConfig::from(&config);
    let pool = feedgen_db::wait_for_database(
        &db_config,
        config.db_max_retries,
        config.db_retry_backoff_base_secs,
    )
    .await?;

    match cli.command {
        None => generate::run_category_feeds(&pool, &config, None).await?,
        Some(Commands::Categories { category, .. }) => {
            generate::run_category_feeds(&pool, &config, category).await?;
        }
        Some(Commands::Flat { .. }) => generate::run_flat_feed(&pool, &config).await?,
        Some(Commands::Inspect { term }) => inspect::run(&pool, &term).await?,
    }

    pool.close().await;
    Ok(())
}
