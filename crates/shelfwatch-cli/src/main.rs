mod ingest;
mod report;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shelfwatch-cli")]
#[command(about = "Scrape book listings and inspect the listings table")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one ingestion pass and print its report
    Ingest {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the listings table with coerced values
    View {
        /// Print rows as JSON
        #[arg(long)]
        json: bool,
        /// Maximum number of rows to print
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print summary statistics and chart data
    Analyze {
        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the ingestion scheduler until Ctrl-C
    Schedule,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("no command given; try `shelfwatch-cli --help`");
        return Ok(());
    };

    let config = shelfwatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Ingest { json } => ingest::run_ingest(&config, json).await,
        Commands::View { json, limit } => report::run_view(&config, json, limit).await,
        Commands::Analyze { json } => report::run_analyze(&config, json).await,
        Commands::Schedule => ingest::run_schedule(config).await,
    }
}

#[cfg(test)]
mod tests;
