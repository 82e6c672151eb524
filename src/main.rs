mod config;
mod predict;
mod report;
mod tle;
mod web;

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{CatalogConfig, Config};
use crate::predict::run_forecast;
use crate::tle::CatalogCache;

#[derive(Parser)]
#[command(name = "sat-o-vis")]
#[command(about = "Visible satellite pass predictor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict passes for the configured observer
    Predict {
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,
        /// Override the minimum peak elevation (degrees)
        #[arg(long)]
        min_elevation: Option<f64>,
        /// Override the forecast horizon (days)
        #[arg(long)]
        days: Option<u32>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Inspect or clear the element-set cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,
    },
    /// Serve predictions over HTTP
    Serve {
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    Status,
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Predict {
            config,
            min_elevation,
            days,
            format,
        } => predict(&config, min_elevation, days, format).await,
        Commands::Cache { action, config } => cache(&config, action),
        Commands::Serve { config } => serve(&config).await,
    }
}

fn load_config(path: &Path) -> Option<Config> {
    match Config::from_file(path) {
        Ok(c) => Some(c),
        Err(e) => {
            eprintln!("Error loading {}: {}", path.display(), e);
            None
        }
    }
}

async fn predict(
    path: &Path,
    min_elevation: Option<f64>,
    days: Option<u32>,
    format: OutputFormat,
) -> ExitCode {
    let Some(mut config) = load_config(path) else {
        return ExitCode::FAILURE;
    };
    if let Some(min_el) = min_elevation {
        config.satellites.min_elevation = min_el;
    }
    if let Some(days) = days {
        config.satellites.days_ahead = days;
    }

    let settings = match config.forecast_settings() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let cache = match CatalogCache::new(&config.catalog) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let satellites = cache.load_all(&config.catalog.sources).await;
    log::info!("Found {} satellites", satellites.len());

    let now = Utc::now();
    let catalog = match run_forecast(&settings, &satellites, now) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Prediction failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match format {
        OutputFormat::Table => print!("{}", report::render_table(&settings, &catalog, now)),
        OutputFormat::Json => match serde_json::to_string_pretty(&catalog) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error encoding catalog: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}

fn cache(path: &Path, action: CacheAction) -> ExitCode {
    // Cache maintenance works without a config file
    let catalog_config = if path.exists() {
        match load_config(path) {
            Some(c) => c.catalog,
            None => return ExitCode::FAILURE,
        }
    } else {
        CatalogConfig::default()
    };

    let cache = match CatalogCache::new(&catalog_config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match action {
        CacheAction::Status => {
            println!("TLE Cache Status ({}):", catalog_config.cache_dir.display());
            println!("{}", "-".repeat(50));
            for status in cache.status(&catalog_config.sources) {
                match (status.age_hours, status.size_kb, status.satellites) {
                    (Some(age), Some(size), Some(count)) => println!(
                        "{:>8}: {} | Age: {:5.1}h | Size: {:6.1}KB | Satellites: {:3}",
                        status.source, status.state, age, size, count
                    ),
                    _ => println!("{:>8}: {}", status.source, status.state),
                }
            }
            ExitCode::SUCCESS
        }
        CacheAction::Clear => match cache.clear() {
            Ok(true) => {
                println!("Cache cleared successfully.");
                ExitCode::SUCCESS
            }
            Ok(false) => {
                println!("No cache to clear.");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error clearing cache: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn serve(path: &Path) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };
    let settings = match config.forecast_settings() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let cache = match CatalogCache::new(&config.catalog) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let catalog = config.catalog;
    match web::run_server(
        &config.web.bind,
        settings,
        cache,
        catalog.sources,
        catalog.max_age,
    )
    .await
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
