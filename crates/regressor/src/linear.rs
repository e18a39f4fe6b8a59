//! Ordinary least squares
//!
//! Multivariate linear regression fit by solving the normal equations
//! with Gaussian elimination (partial pivoting). Works on standardized
//! inputs, so the system stays well-conditioned for this feature count.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{RegressionError, Regressor};

/// Fitted OLS model: one coefficient per feature plus an intercept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearRegression {
    coefficients: Vec<f64>,
    intercept: f64,
    fitted: bool,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl Regressor for LinearRegression {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), RegressionError> {
        let n = x.len();
        let p = x.first().map_or(0, Vec::len);
        if n < p + 1 || n < 2 {
            return Err(RegressionError::InsufficientData {
                required: (p + 1).max(2),
                actual: n,
            });
        }
        if y.len() != n {
            return Err(RegressionError::DimensionMismatch {
                expected: n,
                actual: y.len(),
            });
        }

        // Normal equations over [1 | X]: (A^T A) beta = A^T y.
        let dim = p + 1;
        let mut ata = vec![vec![0.0; dim]; dim];
        let mut aty = vec![0.0; dim];
        for (row, target) in x.iter().zip(y.iter()) {
            if row.len() != p {
                return Err(RegressionError::DimensionMismatch {
                    expected: p,
                    actual: row.len(),
                });
            }
            for i in 0..dim {
                let ai = if i == 0 { 1.0 } else { row[i - 1] };
                aty[i] += ai * target;
                for j in i..dim {
                    let aj = if j == 0 { 1.0 } else { row[j - 1] };
                    ata[i][j] += ai * aj;
                }
            }
        }
        for i in 0..dim {
            for j in 0..i {
                ata[i][j] = ata[j][i];
            }
        }

        let beta = solve(ata, aty)?;
        self.intercept = beta[0];
        self.coefficients = beta[1..].to_vec();
        self.fitted = true;
        debug!("OLS fit over {n} rows, {p} features");
        Ok(())
    }

    fn predict_row(&self, row: &[f64]) -> Result<f64, RegressionError> {
        if !self.fitted {
            return Err(RegressionError::NotFitted);
        }
        if row.len() != self.coefficients.len() {
            return Err(RegressionError::DimensionMismatch {
                expected: self.coefficients.len(),
                actual: row.len(),
            });
        }
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(row.iter())
            .map(|(c, v)| c * v)
            .sum();
        Ok(self.intercept + dot)
    }
}

/// Solve `m * x = b` by Gaussian elimination with partial pivoting.
fn solve(mut m: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, RegressionError> {
    let dim = b.len();

    for col in 0..dim {
        let pivot = (col..dim)
            .max_by(|&a, &b_| m[a][col].abs().partial_cmp(&m[b_][col].abs()).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap_or(col);
        if m[pivot][col].abs() < 1e-10 {
            return Err(RegressionError::Numerical(
                "Singular design matrix in normal equations".to_string(),
            ));
        }
        m.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..dim {
            let factor = m[row][col] / m[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..dim {
                m[row][k] -= factor * m[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; dim];
    for row in (0..dim).rev() {
        let mut sum = b[row];
        for col in (row + 1)..dim {
            sum -= m[row][col] * x[col];
        }
        x[row] = sum / m[row][row];
    }
    Ok(x)
}
