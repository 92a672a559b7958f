mod region;
mod search;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "placesweep")]
#[command(about = "Collect every place matching a query inside a drawn area")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one or more queries against a region and export the results
    Search {
        /// Region as `lat,lng;lat,lng;...` or a JSON file of `[[lat, lng], ...]`
        #[arg(long)]
        region: String,
        /// Search text; repeat to run several queries concurrently
        #[arg(long = "query", required = true)]
        queries: Vec<String>,
        /// Write the export here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Report whether a point lies strictly inside a region
    Contains {
        /// Region as `lat,lng;lat,lng;...` or a JSON file of `[[lat, lng], ...]`
        #[arg(long)]
        region: String,
        /// Point as `lat,lng`
        #[arg(long)]
        point: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            region,
            queries,
            out,
        } => {
            let config = placesweep_core::load_app_config()?;
            init_tracing(&config.log_level)?;
            let region = region::load_region(&region)?;
            search::run_search(&config, region, &queries, out.as_deref()).await?;
        }
        Commands::Contains { region, point } => {
            init_tracing("warn")?;
            let region = region::load_region(&region)?;
            let point = region::parse_point(&point)?;
            println!("{}", region.contains(point));
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `fallback` is used as the filter directive.
fn init_tracing(fallback: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
