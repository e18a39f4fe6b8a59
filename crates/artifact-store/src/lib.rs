//! Artifact Store
//!
//! Persists the three training artifacts (feature schema + column
//! manifest, scaler parameters, model parameters) as versioned blobs in a
//! fixed directory, and exposes the one serving path every surface uses:
//! encode → align → scale → predict over the loaded, read-only bundle.

mod bundle;
mod serving;

pub use bundle::{ArtifactBundle, ArtifactError, ArtifactPaths, ARTIFACT_VERSION};
pub use serving::{ArtifactState, PredictError};
