//! Housing Dataset
//!
//! Raw record model, CSV ingestion and range validation for the housing
//! price pipeline.

mod csv_loader;
mod record;
mod validator;

pub use csv_loader::{load_training_csv, Dataset, LoadError};
pub use record::{HouseRecord, TrainingExample, CATEGORICAL_FIELDS, NUMERIC_FIELDS, TARGET_FIELD};
pub use validator::{ValidationConfig, ValidationError, Validator};
