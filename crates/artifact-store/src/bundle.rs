//! Artifact persistence
//!
//! Three files under the model directory, written once per training run
//! and read-only thereafter: `columns.bin` (feature schema + column
//! manifest), `scaler.bin`, `model.bin`. Each is a postcard blob prefixed
//! with a format version; a mismatch is a load error, not a guess.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use feature_pipeline::{ColumnManifest, FeatureSchema, StandardScaler};
use regressor::RegressionModel;

/// Current artifact format version.
pub const ARTIFACT_VERSION: u32 = 1;

/// Artifact load/store errors.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact missing: {path}")]
    Missing { path: PathBuf },

    #[error("I/O error on {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("Artifact corrupt: {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Artifact {path} has format version {found}, expected {expected}")]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
}

/// Fixed file layout inside the model directory.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    dir: PathBuf,
}

impl ArtifactPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Feature schema and column manifest.
    pub fn columns(&self) -> PathBuf {
        self.dir.join("columns.bin")
    }

    /// Frozen scaler parameters.
    pub fn scaler(&self) -> PathBuf {
        self.dir.join("scaler.bin")
    }

    /// Fitted model parameters.
    pub fn model(&self) -> PathBuf {
        self.dir.join("model.bin")
    }
}

/// Version envelope around every persisted payload.
#[derive(Debug, Serialize, Deserialize)]
struct Versioned<T> {
    version: u32,
    payload: T,
}

/// The schema and its derived manifest travel together: the manifest is
/// the alignment source of truth, the schema is what produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ColumnsArtifact {
    schema: FeatureSchema,
    manifest: ColumnManifest,
}

/// The complete artifact set produced by one training run.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub schema: FeatureSchema,
    pub manifest: ColumnManifest,
    pub scaler: StandardScaler,
    pub model: RegressionModel,
}

impl ArtifactBundle {
    /// Write the three artifacts, creating the directory if needed.
    pub fn save(&self, paths: &ArtifactPaths) -> Result<(), ArtifactError> {
        fs::create_dir_all(paths.dir()).map_err(|e| ArtifactError::Io {
            path: paths.dir().to_path_buf(),
            reason: e.to_string(),
        })?;

        let columns = ColumnsArtifact {
            schema: self.schema.clone(),
            manifest: self.manifest.clone(),
        };
        write_blob(&paths.columns(), &columns)?;
        write_blob(&paths.scaler(), &self.scaler)?;
        write_blob(&paths.model(), &self.model)?;

        info!("Saved artifact bundle under {}", paths.dir().display());
        Ok(())
    }

    /// Load all three artifacts. Any missing or corrupt file fails the
    /// whole load; callers degrade serving rather than retry.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        let columns: ColumnsArtifact = read_blob(&paths.columns())?;
        let scaler: StandardScaler = read_blob(&paths.scaler())?;
        let model: RegressionModel = read_blob(&paths.model())?;

        info!(
            "Loaded artifact bundle from {} ({} columns, {:?} model)",
            paths.dir().display(),
            columns.manifest.len(),
            model.model_type()
        );

        Ok(Self {
            schema: columns.schema,
            manifest: columns.manifest,
            scaler,
            model,
        })
    }
}

fn write_blob<T: Serialize>(path: &Path, payload: &T) -> Result<(), ArtifactError> {
    let envelope = Versioned {
        version: ARTIFACT_VERSION,
        payload,
    };
    let bytes = postcard::to_allocvec(&envelope).map_err(|e| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    fs::write(path, bytes).map_err(|e| ArtifactError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn read_blob<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ArtifactError::Missing {
                path: path.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(ArtifactError::Io {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };

    let envelope: Versioned<T> =
        postcard::from_bytes(&bytes).map_err(|e| ArtifactError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if envelope.version != ARTIFACT_VERSION {
        return Err(ArtifactError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: envelope.version,
            expected: ARTIFACT_VERSION,
        });
    }

    Ok(envelope.payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataset::HouseRecord;
    use feature_pipeline::{encode_records, EncodedTable};
    use regressor::{ModelType, Regressor};

    fn fitted_bundle() -> ArtifactBundle {
        let base = HouseRecord {
            area: 5000.0,
            bedrooms: 3,
            bathrooms: 1,
            stories: 1,
            parking: 0,
            mainroad: "yes".to_string(),
            guestroom: "no".to_string(),
            basement: "no".to_string(),
            hotwaterheating: "no".to_string(),
            airconditioning: "no".to_string(),
            prefarea: "no".to_string(),
            furnishingstatus: "furnished".to_string(),
        };
        let records: Vec<HouseRecord> = (0..30u32)
            .map(|i| {
                let mut r = base.clone();
                r.area = 2000.0 + 200.0 * f64::from(i);
                r.bedrooms = 1 + (i % 5);
                r.bathrooms = 1 + (i % 2);
                r.stories = 1 + (i % 3);
                r.parking = i % 4;
                if i % 2 == 0 {
                    r.mainroad = "no".to_string();
                    r.airconditioning = "yes".to_string();
                }
                r.furnishingstatus = match i % 3 {
                    0 => "furnished",
                    1 => "semi-furnished",
                    _ => "unfurnished",
                }
                .to_string();
                r
            })
            .collect();
        let prices: Vec<f64> = records.iter().map(|r| 100.0 * r.area + 5000.0).collect();

        let schema = FeatureSchema::from_records(&records).unwrap();
        let manifest = schema.manifest();
        let encoded = encode_records(&schema, &records).unwrap();
        let scaler = StandardScaler::fit(&encoded).unwrap();
        let scaled = scaler.transform(&encoded).unwrap();

        let mut model = RegressionModel::new(ModelType::RandomForest);
        model.fit(&scaled.rows, &prices).unwrap();

        ArtifactBundle {
            schema,
            manifest,
            scaler,
            model,
        }
    }

    fn predict_via(bundle: &ArtifactBundle, table: &EncodedTable) -> f64 {
        let aligned = feature_pipeline::align(table, &bundle.manifest);
        let scaled = bundle.scaler.transform_row(&aligned.rows[0]).unwrap();
        bundle.model.predict_row(&scaled).unwrap()
    }

    #[test]
    fn bundle_roundtrips_with_identical_behavior() {
        let bundle = fitted_bundle();
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path());

        bundle.save(&paths).unwrap();
        let loaded = ArtifactBundle::load(&paths).unwrap();

        assert_eq!(loaded.manifest, bundle.manifest);
        assert_eq!(loaded.schema, bundle.schema);
        assert_eq!(loaded.scaler, bundle.scaler);

        // Identical prediction through the reloaded artifacts.
        let record = HouseRecord {
            area: 4300.0,
            bedrooms: 2,
            bathrooms: 1,
            stories: 1,
            parking: 1,
            mainroad: "yes".to_string(),
            guestroom: "no".to_string(),
            basement: "no".to_string(),
            hotwaterheating: "no".to_string(),
            airconditioning: "no".to_string(),
            prefarea: "no".to_string(),
            furnishingstatus: "furnished".to_string(),
        };
        let encoded = encode_records(&bundle.schema, std::slice::from_ref(&record)).unwrap();
        assert_eq!(predict_via(&bundle, &encoded), predict_via(&loaded, &encoded));
    }

    #[test]
    fn missing_file_is_a_missing_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path());

        let err = ArtifactBundle::load(&paths).unwrap_err();
        assert!(matches!(err, ArtifactError::Missing { .. }));
    }

    #[test]
    fn truncated_blob_is_corrupt() {
        let bundle = fitted_bundle();
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path());
        bundle.save(&paths).unwrap();

        std::fs::write(paths.scaler(), [1u8, 2, 3]).unwrap();
        let err = ArtifactBundle::load(&paths).unwrap_err();
        assert!(matches!(err, ArtifactError::Corrupt { .. } | ArtifactError::UnsupportedVersion { .. }));
    }

    #[test]
    fn future_version_is_rejected() {
        let bundle = fitted_bundle();
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path());
        bundle.save(&paths).unwrap();

        let envelope = Versioned {
            version: ARTIFACT_VERSION + 1,
            payload: bundle.scaler.clone(),
        };
        std::fs::write(paths.scaler(), postcard::to_allocvec(&envelope).unwrap()).unwrap();

        let err = ArtifactBundle::load(&paths).unwrap_err();
        assert!(matches!(err, ArtifactError::UnsupportedVersion { .. }));
    }
}
