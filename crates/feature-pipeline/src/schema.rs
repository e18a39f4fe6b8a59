//! Explicit feature schema
//!
//! The schema is the persisted, versioned description of every raw field:
//! numeric fields pass through, categorical fields expand into one
//! indicator column per non-reference level. The reference level is the
//! lexicographically first level of the field, and is dropped from the
//! expansion, so alignment never has to guess which columns a level maps
//! to from incidental string matching.

use serde::{Deserialize, Serialize};

use dataset::{HouseRecord, CATEGORICAL_FIELDS, NUMERIC_FIELDS};

use crate::align::ColumnManifest;

/// Current schema format version. Bumped on any change to the encoded
/// representation; loaders reject other versions.
pub const SCHEMA_VERSION: u32 = 1;

/// Schema construction and lookup errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    #[error("Categorical field '{0}' has no observed levels")]
    NoLevels(String),

    #[error("Schema version {found} is not supported (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

/// How a raw field enters the encoded table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Passed through as a single numeric column.
    Numeric,
    /// Expanded into one indicator column per non-reference level.
    /// Levels are kept sorted; the first is the reference level.
    Categorical { levels: Vec<String> },
}

/// One raw field and its encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    /// The reference (dropped) level of a categorical field.
    pub fn reference_level(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Numeric => None,
            FieldKind::Categorical { levels } => levels.first().map(String::as_str),
        }
    }

    /// Encoded column names this field contributes, in order.
    pub fn encoded_columns(&self) -> Vec<String> {
        match &self.kind {
            FieldKind::Numeric => vec![self.name.clone()],
            FieldKind::Categorical { levels } => levels
                .iter()
                .skip(1)
                .map(|level| format!("{}_{}", self.name, level))
                .collect(),
        }
    }
}

/// The frozen description of the full feature space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u32,
    pub fields: Vec<FieldSpec>,
}

impl FeatureSchema {
    /// Derive a schema from a training corpus: numeric fields in record
    /// order, then categorical fields in record order with the level sets
    /// actually observed, sorted.
    pub fn from_records(records: &[HouseRecord]) -> Result<Self, SchemaError> {
        let mut fields: Vec<FieldSpec> = NUMERIC_FIELDS
            .iter()
            .map(|name| FieldSpec {
                name: (*name).to_string(),
                kind: FieldKind::Numeric,
            })
            .collect();

        for (idx, name) in CATEGORICAL_FIELDS.iter().enumerate() {
            let mut levels: Vec<String> = Vec::new();
            for record in records {
                let value = record.categorical_values()[idx].1;
                if !levels.iter().any(|l| l == value) {
                    levels.push(value.to_string());
                }
            }
            if levels.is_empty() {
                return Err(SchemaError::NoLevels((*name).to_string()));
            }
            levels.sort();
            fields.push(FieldSpec {
                name: (*name).to_string(),
                kind: FieldKind::Categorical { levels },
            });
        }

        Ok(Self {
            version: SCHEMA_VERSION,
            fields,
        })
    }

    /// Reject schemas written by an incompatible format.
    pub fn check_version(&self) -> Result<(), SchemaError> {
        if self.version != SCHEMA_VERSION {
            return Err(SchemaError::UnsupportedVersion {
                found: self.version,
                expected: SCHEMA_VERSION,
            });
        }
        Ok(())
    }

    /// The ordered encoded-column manifest this schema produces.
    pub fn manifest(&self) -> ColumnManifest {
        let columns = self
            .fields
            .iter()
            .flat_map(|field| field.encoded_columns())
            .collect();
        ColumnManifest::new(columns)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}
