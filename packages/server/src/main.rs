#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the festival map server.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use festival_map_server::config::AppConfig;
use festival_map_server::pipeline::{self, PipelineOutcome};
use festival_map_server_models::MapQueryParams;

#[derive(Parser)]
#[command(name = "festival_map_server", about = "Noto festival map dashboard")]
struct Cli {
    /// Configuration file (default: `festival_map.toml` if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard
    Serve,
    /// Render the map for one filter state to an HTML file
    Render {
        /// Comma-separated town option indices (default: all towns)
        #[arg(long)]
        towns: Option<String>,
        /// First month of the range
        #[arg(long)]
        start: Option<u8>,
        /// Last month of the range
        #[arg(long)]
        stop: Option<u8>,
        /// Output file
        #[arg(long, default_value = "map.html")]
        output: PathBuf,
    },
    /// List the town options and their indices
    Towns,
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    let Some(command) = cli.command else {
        return Ok(festival_map_server::interactive::run(config).await?);
    };

    match command {
        Commands::Serve => festival_map_server::run_server(config).await?,
        Commands::Render {
            towns,
            start,
            stop,
            output,
        } => {
            let dataset = pipeline::load_dataset(&config)?;
            let params = MapQueryParams { towns, start, stop };
            let filter = pipeline::filter_state_from_params(&dataset, &params)?;

            match pipeline::render_map(&dataset, &filter, &config.map.options())? {
                PipelineOutcome::Map(page) => {
                    std::fs::write(&output, page)?;
                    log::info!("Wrote map to {}", output.display());
                }
                PipelineOutcome::Halted(warning) => {
                    return Err(warning.into());
                }
            }
        }
        Commands::Towns => {
            let dataset = pipeline::load_dataset(&config)?;
            println!("{:<6} TOWN", "INDEX");
            println!("{}", "-".repeat(30));
            for (index, town) in dataset.town_options().iter().enumerate() {
                println!(
                    "{index:<6} {}",
                    town.as_deref()
                        .unwrap_or(festival_map_server_models::UNKNOWN_TOWN_LABEL)
                );
            }
        }
    }

    Ok(())
}
