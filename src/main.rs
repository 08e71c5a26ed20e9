//! Gaia climate dashboard service.
//!
//! Usage:
//!   gaia serve
//!   gaia estimate --km-per-week 100 --diet Mixed --recycles No

use anyhow::Result;
use clap::{Parser, Subcommand};
use gaia::config::{Config, RuntimeConfig};
use gaia::footprint::{Questionnaire, QuestionnaireForm, estimate};
use tracing::info;

#[derive(Parser)]
#[command(name = "gaia")]
#[command(about = "Personal climate sustainability dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP dashboard API
    Serve,
    /// Estimate a weekly carbon footprint and print the breakdown as JSON
    Estimate {
        #[arg(long, default_value_t = 0.0)]
        km_per_week: f64,
        #[arg(long, default_value_t = 0.0)]
        electricity_kwh_per_month: f64,
        /// Vegetarian, Mixed or Non-Vegetarian
        #[arg(long, default_value = "Mixed")]
        diet: String,
        #[arg(long, default_value_t = 0)]
        flights_per_year: u32,
        /// Yes or No
        #[arg(long, default_value = "Yes")]
        recycles: String,
        #[arg(long, default_value_t = 0.0)]
        water_liters_per_day: f64,
        /// Minimal, Average or Frequent
        #[arg(long, default_value = "Average")]
        shopping_habit: String,
        #[arg(long, default_value_t = 0.0)]
        digital_hours_per_day: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Subscriber first so configuration warnings are not lost.
    Config::load_env_files();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            RuntimeConfig::log_level_from_env(),
        ))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    match cli.command {
        Commands::Serve => serve(config).await,
        Commands::Estimate {
            km_per_week,
            electricity_kwh_per_month,
            diet,
            flights_per_year,
            recycles,
            water_liters_per_day,
            shopping_habit,
            digital_hours_per_day,
        } => {
            let form = QuestionnaireForm {
                km_per_week,
                electricity_kwh_per_month,
                diet,
                flights_per_year,
                recycles,
                water_liters_per_day,
                shopping_habit,
                digital_hours_per_day,
            };
            let breakdown = estimate(&Questionnaire::try_from(form)?)?;
            println!("{}", serde_json::to_string_pretty(&breakdown)?);
            Ok(())
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    info!(
        "Starting Gaia (model={}, news_page_size={})",
        config.generation.model, config.news.page_size
    );
    let state = gaia::build_state(config)?;
    gaia::http::start_http_server(state).await
}
