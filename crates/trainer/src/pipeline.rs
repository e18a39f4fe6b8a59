//! Batch training pipeline
//!
//! One synchronous pass: read the corpus, encode, split, fit the scaler
//! and the model, evaluate on the held-out split, freeze the artifact
//! bundle, render the evaluation outputs. Any failure aborts the run.

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use tracing::{info, warn};

use artifact_store::{ArtifactBundle, ArtifactPaths};
use dataset::{load_training_csv, HouseRecord, Validator};
use feature_pipeline::{align, encode_records, EncodedTable, FeatureSchema, StandardScaler};
use regressor::{
    evaluate, EvaluationMetrics, EvaluationReport, ModelType, PredictionPoint,
    RandomForestParams, RandomForestRegressor, RegressionModel, Regressor,
};

use crate::plot::render_scatter;
use crate::split::train_test_split;

/// A full training run's inputs.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub input: PathBuf,
    pub model_dir: PathBuf,
    pub output_dir: PathBuf,
    pub model_type: ModelType,
    pub test_size: f64,
    pub seed: u64,
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub n_rows: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub skipped: usize,
    pub metrics: EvaluationMetrics,
}

/// Execute the pipeline end to end.
pub fn run(config: &TrainingConfig) -> anyhow::Result<TrainingReport> {
    info!("[1/3] Loading and preprocessing {}", config.input.display());
    let dataset = load_training_csv(&config.input)?;

    let validator = Validator::default();
    let suspicious = dataset
        .examples
        .iter()
        .filter(|e| !validator.validate_record(&e.features).is_empty())
        .count();
    if suspicious > 0 {
        warn!("{suspicious} rows have out-of-range numeric attributes");
    }

    let records: Vec<HouseRecord> = dataset.examples.iter().map(|e| e.features.clone()).collect();
    let prices: Vec<f64> = dataset.examples.iter().map(|e| e.price).collect();

    let schema = FeatureSchema::from_records(&records)?;
    let manifest = schema.manifest();
    let encoded = encode_records(&schema, &records)?;
    info!(
        "Encoded {} rows into {} feature columns",
        encoded.n_rows(),
        encoded.n_columns()
    );

    let (train_idx, test_idx) = train_test_split(encoded.n_rows(), config.test_size, config.seed);
    let train = select_rows(&encoded, &train_idx);
    let test = select_rows(&encoded, &test_idx);
    let y_train = select_values(&prices, &train_idx);
    let y_test = select_values(&prices, &test_idx);
    info!("Split: {} train / {} test rows", train.n_rows(), test.n_rows());

    // Scaler parameters come from the training split only; the test
    // split goes through the same align-then-transform path inference
    // will use.
    let scaler = StandardScaler::fit(&train)?;
    let train_scaled = scaler.transform(&train)?;
    let test_aligned = align(&test, &manifest);
    let test_scaled = scaler.transform(&test_aligned)?;

    info!("[2/3] Training {} model", config.model_type.as_str());
    let mut model = build_model(config.model_type, config.seed);
    model.fit(&train_scaled.rows, &y_train)?;

    info!("[3/3] Evaluating and persisting artifacts");
    let predicted = model.predict(&test_scaled.rows)?;
    let metrics = evaluate(&y_test, &predicted).context("evaluation split was empty")?;
    info!(
        "Evaluation: MSE={:.4} RMSE={:.4} MAE={:.4} R2={:.4}",
        metrics.mse, metrics.rmse, metrics.mae, metrics.r2
    );

    let bundle = ArtifactBundle {
        schema,
        manifest,
        scaler,
        model,
    };
    bundle.save(&ArtifactPaths::new(&config.model_dir))?;

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("creating output directory {}", config.output_dir.display())
    })?;
    let points: Vec<PredictionPoint> = y_test
        .iter()
        .zip(predicted.iter())
        .map(|(&actual, &predicted)| PredictionPoint { actual, predicted })
        .collect();

    let report_path = config.output_dir.join("evaluation.json");
    let file = File::create(&report_path)
        .with_context(|| format!("creating {}", report_path.display()))?;
    serde_json::to_writer_pretty(
        file,
        &EvaluationReport {
            metrics,
            points: points.clone(),
        },
    )?;

    render_scatter(&points, &config.output_dir.join("actual_vs_predicted.png"))?;

    Ok(TrainingReport {
        n_rows: dataset.len(),
        n_train: train_idx.len(),
        n_test: test_idx.len(),
        skipped: dataset.skipped,
        metrics,
    })
}

fn build_model(model_type: ModelType, seed: u64) -> RegressionModel {
    match model_type {
        ModelType::Linear => RegressionModel::new(ModelType::Linear),
        ModelType::RandomForest => RegressionModel::RandomForest(RandomForestRegressor::new(
            RandomForestParams {
                seed,
                ..RandomForestParams::default()
            },
        )),
    }
}

fn select_rows(table: &EncodedTable, indices: &[usize]) -> EncodedTable {
    EncodedTable {
        columns: table.columns.clone(),
        rows: indices.iter().map(|&i| table.rows[i].clone()).collect(),
    }
}

fn select_values(values: &[f64], indices: &[usize]) -> Vec<f64> {
    indices.iter().map(|&i| values[i]).collect()
}
