//! Random forest regression
//!
//! Bagged CART regression trees: each tree is fit on a bootstrap sample
//! and splits on a random feature subset; prediction averages the trees.
//! Seeded, so a training run is reproducible end to end.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{RegressionError, Regressor};

/// Forest hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 12,
            min_samples_split: 4,
            seed: 42,
        }
    }
}

/// One node of a fitted regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn predict(&self, row: &[f64]) -> f64 {
        match self {
            TreeNode::Leaf { value } => *value,
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if row[*feature] <= *threshold {
                    left.predict(row)
                } else {
                    right.predict(row)
                }
            }
        }
    }
}

/// Fitted random forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    params: RandomForestParams,
    trees: Vec<TreeNode>,
    n_features: usize,
}

impl RandomForestRegressor {
    pub fn new(params: RandomForestParams) -> Self {
        Self {
            params,
            trees: Vec::new(),
            n_features: 0,
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for RandomForestRegressor {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), RegressionError> {
        let n = x.len();
        if n < self.params.min_samples_split {
            return Err(RegressionError::InsufficientData {
                required: self.params.min_samples_split,
                actual: n,
            });
        }
        if y.len() != n {
            return Err(RegressionError::DimensionMismatch {
                expected: n,
                actual: y.len(),
            });
        }
        let p = x[0].len();
        for row in x {
            if row.len() != p {
                return Err(RegressionError::DimensionMismatch {
                    expected: p,
                    actual: row.len(),
                });
            }
        }

        // Features considered per split, the usual p/3 heuristic for
        // regression forests.
        let m_features = (p / 3).max(1);
        let mut rng = StdRng::seed_from_u64(self.params.seed);

        self.trees = (0..self.params.n_trees)
            .map(|_| {
                let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                grow_tree(x, y, &indices, 0, m_features, &self.params, &mut rng)
            })
            .collect();
        self.n_features = p;
        debug!(
            "Fitted {} trees over {} rows, {} features",
            self.trees.len(),
            n,
            p
        );
        Ok(())
    }

    fn predict_row(&self, row: &[f64]) -> Result<f64, RegressionError> {
        if self.trees.is_empty() {
            return Err(RegressionError::NotFitted);
        }
        if row.len() != self.n_features {
            return Err(RegressionError::DimensionMismatch {
                expected: self.n_features,
                actual: row.len(),
            });
        }
        let sum: f64 = self.trees.iter().map(|tree| tree.predict(row)).sum();
        Ok(sum / self.trees.len() as f64)
    }
}

fn mean(y: &[f64], indices: &[usize]) -> f64 {
    indices.iter().map(|&i| y[i]).sum::<f64>() / indices.len() as f64
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    score: f64,
}

fn grow_tree(
    x: &[Vec<f64>],
    y: &[f64],
    indices: &[usize],
    depth: usize,
    m_features: usize,
    params: &RandomForestParams,
    rng: &mut StdRng,
) -> TreeNode {
    if depth >= params.max_depth || indices.len() < params.min_samples_split {
        return TreeNode::Leaf {
            value: mean(y, indices),
        };
    }

    let p = x[0].len();
    let mut candidates: Vec<usize> = (0..p).collect();
    // Partial Fisher-Yates: the first m_features entries are the sample.
    for i in 0..m_features.min(p) {
        let j = rng.gen_range(i..p);
        candidates.swap(i, j);
    }
    candidates.truncate(m_features.min(p));

    let best = candidates
        .iter()
        .filter_map(|&feature| best_split_on(x, y, indices, feature))
        .min_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal));

    let Some(best) = best else {
        return TreeNode::Leaf {
            value: mean(y, indices),
        };
    };

    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .copied()
        .partition(|&i| x[i][best.feature] <= best.threshold);
    if left_idx.is_empty() || right_idx.is_empty() {
        return TreeNode::Leaf {
            value: mean(y, indices),
        };
    }

    TreeNode::Split {
        feature: best.feature,
        threshold: best.threshold,
        left: Box::new(grow_tree(x, y, &left_idx, depth + 1, m_features, params, rng)),
        right: Box::new(grow_tree(x, y, &right_idx, depth + 1, m_features, params, rng)),
    }
}

/// Best SSE-reducing threshold for one feature, via a sorted sweep with
/// running sums.
fn best_split_on(x: &[Vec<f64>], y: &[f64], indices: &[usize], feature: usize) -> Option<BestSplit> {
    let mut pairs: Vec<(f64, f64)> = indices.iter().map(|&i| (x[i][feature], y[i])).collect();
    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let n = pairs.len() as f64;
    let total_sum: f64 = pairs.iter().map(|(_, t)| t).sum();
    let total_sq: f64 = pairs.iter().map(|(_, t)| t * t).sum();

    let mut left_sum = 0.0;
    let mut left_sq = 0.0;
    let mut best: Option<BestSplit> = None;

    for (k, window) in pairs.windows(2).enumerate() {
        left_sum += window[0].1;
        left_sq += window[0].1 * window[0].1;

        // No valid threshold between equal feature values.
        if window[0].0 == window[1].0 {
            continue;
        }

        let n_left = (k + 1) as f64;
        let n_right = n - n_left;
        let right_sum = total_sum - left_sum;
        let right_sq = total_sq - left_sq;

        let sse = (left_sq - left_sum * left_sum / n_left) + (right_sq - right_sum * right_sum / n_right);
        let threshold = (window[0].0 + window[1].0) / 2.0;

        if best.as_ref().map_or(true, |b| sse < b.score) {
            best = Some(BestSplit {
                feature,
                threshold,
                score: sse,
            });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        // A step function the forest should capture almost exactly.
        let x: Vec<Vec<f64>> = (0..60).map(|i| vec![i as f64, (i % 3) as f64]).collect();
        let y: Vec<f64> = (0..60)
            .map(|i| if i < 30 { 100.0 } else { 500.0 })
            .collect();
        (x, y)
    }

    #[test]
    fn learns_a_step_function() {
        let (x, y) = step_data();
        let mut model = RandomForestRegressor::new(RandomForestParams {
            n_trees: 25,
            ..RandomForestParams::default()
        });
        model.fit(&x, &y).unwrap();

        let low = model.predict_row(&[10.0, 1.0]).unwrap();
        let high = model.predict_row(&[50.0, 2.0]).unwrap();
        assert!(low < 200.0, "expected low plateau, got {low}");
        assert!(high > 400.0, "expected high plateau, got {high}");
    }

    #[test]
    fn same_seed_reproduces_the_fit() {
        let (x, y) = step_data();
        let params = RandomForestParams {
            n_trees: 10,
            seed: 7,
            ..RandomForestParams::default()
        };

        let mut a = RandomForestRegressor::new(params.clone());
        let mut b = RandomForestRegressor::new(params);
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();

        let row = [17.0, 0.0];
        assert_eq!(a.predict_row(&row).unwrap(), b.predict_row(&row).unwrap());
    }

    #[test]
    fn unfitted_forest_reports_not_fitted() {
        let model = RandomForestRegressor::new(RandomForestParams::default());
        assert!(matches!(
            model.predict_row(&[1.0]),
            Err(RegressionError::NotFitted)
        ));
    }

    #[test]
    fn prediction_width_is_checked() {
        let (x, y) = step_data();
        let mut model = RandomForestRegressor::new(RandomForestParams {
            n_trees: 5,
            ..RandomForestParams::default()
        });
        model.fit(&x, &y).unwrap();

        assert!(matches!(
            model.predict_row(&[1.0]),
            Err(RegressionError::DimensionMismatch { .. })
        ));
    }
}
