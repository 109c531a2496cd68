use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tessera::DashboardConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod http;
mod store;

use commands::WidgetTarget;

#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(about = "Tessera CLI - build, fetch and save dashboard widget queries")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "tessera.toml", env = "TESSERA_CONFIG")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct TargetArgs {
    /// Dashboard YAML file
    #[arg(short, long)]
    dashboard: PathBuf,

    /// Widget name within the dashboard
    #[arg(short, long)]
    widget: String,

    /// Last day of the default date range (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    today: Option<NaiveDate>,
}

impl TargetArgs {
    fn into_target(self) -> WidgetTarget {
        WidgetTarget {
            dashboard: self.dashboard,
            widget: self.widget,
            today: self.today.unwrap_or_else(|| chrono::Local::now().date_naive()),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List aggregation types and their parameters
    Aggregations {
        /// Show descriptions
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate aggregation parameter values
    Validate {
        /// Aggregation type id, e.g. cardinality
        #[arg(short = 't', long = "type")]
        type_id: String,

        /// Parameter values as a JSON object
        #[arg(long, default_value = "{}")]
        values: String,
    },

    /// Print the search request a widget would send
    Build {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Fetch a widget's data and print the results
    Fetch {
        #[command(flatten)]
        target: TargetArgs,

        /// Request timeout in seconds
        #[arg(long, default_value = "30")]
        timeout: u64,
    },

    /// Save a widget with the default aggregations as JSON
    Save {
        #[command(flatten)]
        target: TargetArgs,

        /// Output directory; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(config: &DashboardConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone()),
    );
    let json = config.logging.format == "json";

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = DashboardConfig::load_or_create(&cli.config)?;
    init_logging(&config);

    tracing::debug!("Config file: {}", cli.config.display());

    match cli.command {
        Commands::Aggregations { verbose } => commands::run_aggregations(verbose)?,
        Commands::Validate { type_id, values } => commands::run_validate(&type_id, &values)?,
        Commands::Build { target } => commands::run_build(&config, &target.into_target())?,
        Commands::Fetch { target, timeout } => {
            commands::run_fetch(&config, &target.into_target(), Duration::from_secs(timeout))
                .await?
        }
        Commands::Save { target, output } => {
            commands::run_save(&config, &target.into_target(), output.as_deref()).await?
        }
    }

    Ok(())
}
