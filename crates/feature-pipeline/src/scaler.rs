//! Frozen standardization
//!
//! Per-column `(x - mean) / std` with parameters fixed at fit time. The
//! scaler is fit once on the training split and applied unchanged to the
//! test split and to every inference request. A column with zero variance
//! at fit time stores a unit standard deviation, so its transform reduces
//! to mean removal instead of dividing by zero.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::encode::EncodedTable;

/// Smallest standard deviation treated as non-constant.
const STD_FLOOR: f64 = 1e-12;

/// Scaling errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScaleError {
    #[error("Cannot fit a scaler on an empty table")]
    EmptyInput,

    #[error("Input has {actual} columns, scaler was fit on {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Per-column standardization parameters, frozen at fit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    /// Fit means and population standard deviations column-wise.
    pub fn fit(table: &EncodedTable) -> Result<Self, ScaleError> {
        if table.rows.is_empty() || table.columns.is_empty() {
            return Err(ScaleError::EmptyInput);
        }

        let n = table.rows.len() as f64;
        let width = table.n_columns();

        let mut means = vec![0.0; width];
        for row in &table.rows {
            for (mean, value) in means.iter_mut().zip(row.iter()) {
                *mean += value;
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        let mut stds = vec![0.0; width];
        for row in &table.rows {
            for ((std, value), mean) in stds.iter_mut().zip(row.iter()).zip(means.iter()) {
                let delta = value - mean;
                *std += delta * delta;
            }
        }
        let constant = stds.iter().filter(|s| (**s / n).sqrt() < STD_FLOOR).count();
        if constant > 0 {
            debug!("{constant} constant columns; clamping their std to 1.0");
        }
        for std in &mut stds {
            *std = (*std / n).sqrt();
            if *std < STD_FLOOR {
                *std = 1.0;
            }
        }

        Ok(Self { means, stds })
    }

    pub fn n_columns(&self) -> usize {
        self.means.len()
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn stds(&self) -> &[f64] {
        &self.stds
    }

    /// Standardize a single row with the frozen parameters.
    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>, ScaleError> {
        if row.len() != self.means.len() {
            return Err(ScaleError::DimensionMismatch {
                expected: self.means.len(),
                actual: row.len(),
            });
        }
        Ok(row
            .iter()
            .zip(self.means.iter().zip(self.stds.iter()))
            .map(|(value, (mean, std))| (value - mean) / std)
            .collect())
    }

    /// Standardize a whole table, preserving column names.
    pub fn transform(&self, table: &EncodedTable) -> Result<EncodedTable, ScaleError> {
        if table.n_columns() != self.means.len() {
            return Err(ScaleError::DimensionMismatch {
                expected: self.means.len(),
                actual: table.n_columns(),
            });
        }
        let rows = table
            .rows
            .iter()
            .map(|row| self.transform_row(row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EncodedTable {
            columns: table.columns.clone(),
            rows,
        })
    }
}
