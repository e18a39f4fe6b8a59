//! Evaluation metrics

use serde::{Deserialize, Serialize};

/// Held-out regression metrics reported by the training pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

/// One held-out observation and the model's estimate for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub actual: f64,
    pub predicted: f64,
}

/// Metrics plus the point pairs behind them; what the trainer writes for
/// downstream visualization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub metrics: EvaluationMetrics,
    pub points: Vec<PredictionPoint>,
}

/// Compute MSE, RMSE, MAE and R² over paired actuals and predictions.
/// Returns `None` for empty or mismatched inputs.
pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Option<EvaluationMetrics> {
    if actual.is_empty() || actual.len() != predicted.len() {
        return None;
    }

    let n = actual.len() as f64;
    let mse = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / n;
    let mae = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n;

    let mean = actual.iter().sum::<f64>() / n;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    // A constant target makes R² undefined; report 0 rather than NaN.
    let r2 = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

    Some(EvaluationMetrics {
        mse,
        rmse: mse.sqrt(),
        mae,
        r2,
    })
}
