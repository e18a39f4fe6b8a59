//! Housing Price Trainer - Batch Entry Point

mod pipeline;
mod plot;
mod split;

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use regressor::ModelType;

use pipeline::{run, TrainingConfig};

#[derive(Parser)]
#[command(name = "house-trainer")]
#[command(about = "Train the housing price model and freeze its artifacts", long_about = None)]
struct Args {
    /// Input CSV with the twelve feature columns and a price column
    #[arg(short, long, default_value = "data/housing.csv")]
    input: PathBuf,

    /// Directory for the frozen artifact bundle
    #[arg(long, default_value = "models")]
    model_dir: PathBuf,

    /// Directory for the evaluation plot and report
    #[arg(long, default_value = "outputs")]
    output_dir: PathBuf,

    /// Model type (linear, random-forest)
    #[arg(short, long, default_value = "linear")]
    model: ModelType,

    /// Held-out test fraction
    #[arg(long, default_value_t = 0.2)]
    test_size: f64,

    /// Seed for the split and the forest
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

fn main() {
    init_logging();
    let args = Args::parse();

    info!("=== Housing Price Trainer v{} ===", env!("CARGO_PKG_VERSION"));

    let config = TrainingConfig {
        input: args.input,
        model_dir: args.model_dir,
        output_dir: args.output_dir,
        model_type: args.model,
        test_size: args.test_size,
        seed: args.seed,
    };

    match run(&config) {
        Ok(report) => {
            info!(
                "Training complete: {} rows ({} train / {} test, {} skipped), RMSE={:.2}, R2={:.4}",
                report.n_rows, report.n_train, report.n_test, report.skipped,
                report.metrics.rmse, report.metrics.r2
            );
        }
        Err(err) => {
            error!("Training pipeline failed: {err:#}");
            std::process::exit(1);
        }
    }
}
