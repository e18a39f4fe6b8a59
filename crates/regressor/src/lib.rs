//! Regression Models
//!
//! The estimator side of the serving contract: anything that can
//! `fit(X, y)` and then `predict(row) -> f64` is substitutable. Two
//! implementations are provided, ordinary least squares and a random
//! forest, behind a serializable model enum so a fitted estimator can be
//! frozen to disk and reloaded by every serving process.

mod forest;
mod linear;
mod metrics;

pub use forest::{RandomForestParams, RandomForestRegressor};
pub use linear::LinearRegression;
pub use metrics::{evaluate, EvaluationMetrics, EvaluationReport, PredictionPoint};

use serde::{Deserialize, Serialize};

/// Regression errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegressionError {
    #[error("Model has not been fitted")]
    NotFitted,

    #[error("Insufficient training data: need at least {required} rows, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Input has {actual} features, model was fit on {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Numerical error: {0}")]
    Numerical(String),
}

/// The fit/predict capability pair every estimator satisfies.
pub trait Regressor {
    /// Fit on row-major features and their targets.
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), RegressionError>;

    /// Predict a single row.
    fn predict_row(&self, row: &[f64]) -> Result<f64, RegressionError>;

    /// Predict a batch of rows.
    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, RegressionError> {
        x.iter().map(|row| self.predict_row(row)).collect()
    }
}

/// Which estimator the trainer fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    Linear,
    RandomForest,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Linear => "linear",
            ModelType::RandomForest => "random-forest",
        }
    }
}

impl std::str::FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(ModelType::Linear),
            "random-forest" | "random_forest" => Ok(ModelType::RandomForest),
            other => Err(format!("Unknown model type: {other}")),
        }
    }
}

/// A fitted estimator, serializable as the model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RegressionModel {
    Linear(LinearRegression),
    RandomForest(RandomForestRegressor),
}

impl RegressionModel {
    /// An unfitted model of the requested type with default parameters.
    pub fn new(model_type: ModelType) -> Self {
        match model_type {
            ModelType::Linear => RegressionModel::Linear(LinearRegression::new()),
            ModelType::RandomForest => {
                RegressionModel::RandomForest(RandomForestRegressor::new(RandomForestParams::default()))
            }
        }
    }

    pub fn model_type(&self) -> ModelType {
        match self {
            RegressionModel::Linear(_) => ModelType::Linear,
            RegressionModel::RandomForest(_) => ModelType::RandomForest,
        }
    }
}

impl Regressor for RegressionModel {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), RegressionError> {
        match self {
            RegressionModel::Linear(model) => model.fit(x, y),
            RegressionModel::RandomForest(model) => model.fit(x, y),
        }
    }

    fn predict_row(&self, row: &[f64]) -> Result<f64, RegressionError> {
        match self {
            RegressionModel::Linear(model) => model.predict_row(row),
            RegressionModel::RandomForest(model) => model.predict_row(row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_type_parses_cli_spellings() {
        assert_eq!("linear".parse::<ModelType>().unwrap(), ModelType::Linear);
        assert_eq!(
            "random-forest".parse::<ModelType>().unwrap(),
            ModelType::RandomForest
        );
        assert_eq!(
            "random_forest".parse::<ModelType>().unwrap(),
            ModelType::RandomForest
        );
        assert!("gradient-boost".parse::<ModelType>().is_err());
    }

    #[test]
    fn model_enum_dispatches_fit_and_predict() {
        let x: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64]).collect();
        let y: Vec<f64> = (0..20).map(|i| 2.0 * i as f64 + 1.0).collect();

        let mut model = RegressionModel::new(ModelType::Linear);
        model.fit(&x, &y).unwrap();

        let prediction = model.predict_row(&[10.0]).unwrap();
        assert!((prediction - 21.0).abs() < 1e-6);
        assert_eq!(model.model_type(), ModelType::Linear);
    }
}
