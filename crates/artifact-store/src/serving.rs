//! The shared serving path
//!
//! Every surface (REST, form UI, the trainer's own evaluation) predicts
//! through the same sequence over the loaded bundle: encode the raw
//! record against the frozen schema, align to the manifest, apply the
//! frozen scaler, run the estimator. The bundle is read-only after load,
//! so concurrent readers need no coordination.

use std::sync::Arc;

use tracing::{debug, error};

use dataset::HouseRecord;
use feature_pipeline::{align, encode_records, EncodeError, ScaleError};
use regressor::{RegressionError, Regressor};

use crate::bundle::{ArtifactBundle, ArtifactPaths};

/// Prediction failures on the serving path.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PredictError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Scale(#[from] ScaleError),

    #[error(transparent)]
    Regression(#[from] RegressionError),
}

impl ArtifactBundle {
    /// Predict a sale price for one raw record.
    pub fn predict(&self, record: &HouseRecord) -> Result<f64, PredictError> {
        let encoded = encode_records(&self.schema, std::slice::from_ref(record))?;
        let aligned = align(&encoded, &self.manifest);
        let scaled = self.scaler.transform_row(&aligned.rows[0])?;
        let price = self.model.predict_row(&scaled)?;
        debug!("Predicted price {price:.2}");
        Ok(price)
    }
}

/// Load-state of a serving process's artifact set.
///
/// A process starts uninitialized, attempts one load, and is then either
/// ready or degraded for its lifetime; a degraded process answers every
/// prediction with a fixed error instead of crashing, and never retries.
#[derive(Debug, Clone)]
pub enum ArtifactState {
    Ready(Arc<ArtifactBundle>),
    Degraded { reason: String },
}

impl ArtifactState {
    /// Attempt the one startup load.
    pub fn load(paths: &ArtifactPaths) -> Self {
        match ArtifactBundle::load(paths) {
            Ok(bundle) => ArtifactState::Ready(Arc::new(bundle)),
            Err(err) => {
                error!("Artifact load failed, serving degraded: {err}");
                ArtifactState::Degraded {
                    reason: err.to_string(),
                }
            }
        }
    }

    pub fn bundle(&self) -> Option<&ArtifactBundle> {
        match self {
            ArtifactState::Ready(bundle) => Some(bundle),
            ArtifactState::Degraded { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ArtifactState::Ready(_))
    }
}
