//! One-hot feature encoding
//!
//! Turns raw records into an all-numeric table under a frozen schema.
//! Numeric fields pass through; each categorical field contributes one
//! indicator column per non-reference level. A level the schema has never
//! seen is a reported error, never a silent all-zeros row.

use tracing::debug;

use dataset::HouseRecord;

use crate::schema::{FeatureSchema, FieldKind};

/// Encoding errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EncodeError {
    #[error("Unknown level '{value}' for categorical field '{field}'")]
    UnknownLevel { field: String, value: String },

    #[error("Schema field '{0}' has no counterpart in the record")]
    UnknownField(String),
}

/// A numeric table with named, ordered columns.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedTable {
    pub columns: Vec<String>,
    /// Row-major values; every row has `columns.len()` entries.
    pub rows: Vec<Vec<f64>>,
}

impl EncodedTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }
}

/// Encode a batch of records into a table whose columns follow the
/// schema's manifest order.
pub fn encode_records(
    schema: &FeatureSchema,
    records: &[HouseRecord],
) -> Result<EncodedTable, EncodeError> {
    let mut table = EncodedTable::new(schema.manifest().into_columns());
    for record in records {
        table.rows.push(encode_record(schema, record)?);
    }
    debug!(
        "Encoded {} records into {} columns",
        table.n_rows(),
        table.n_columns()
    );
    Ok(table)
}

/// Encode a single record into a vector in schema column order.
pub fn encode_record(schema: &FeatureSchema, record: &HouseRecord) -> Result<Vec<f64>, EncodeError> {
    let numeric = record.numeric_values();
    let categorical = record.categorical_values();

    let mut values = Vec::new();
    for field in &schema.fields {
        match &field.kind {
            FieldKind::Numeric => {
                let (_, value) = numeric
                    .iter()
                    .find(|(name, _)| *name == field.name)
                    .ok_or_else(|| EncodeError::UnknownField(field.name.clone()))?;
                values.push(*value);
            }
            FieldKind::Categorical { levels } => {
                let (_, value) = categorical
                    .iter()
                    .find(|(name, _)| *name == field.name)
                    .ok_or_else(|| EncodeError::UnknownField(field.name.clone()))?;
                if !levels.iter().any(|l| l == value) {
                    return Err(EncodeError::UnknownLevel {
                        field: field.name.clone(),
                        value: (*value).to_string(),
                    });
                }
                // Indicator per non-reference level.
                for level in levels.iter().skip(1) {
                    values.push(if level == value { 1.0 } else { 0.0 });
                }
            }
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<HouseRecord> {
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
        let mut flipped = base.clone();
        flipped.mainroad = "no".to_string();
        flipped.guestroom = "yes".to_string();
        flipped.basement = "yes".to_string();
        flipped.hotwaterheating = "yes".to_string();
        flipped.airconditioning = "yes".to_string();
        flipped.prefarea = "yes".to_string();
        flipped.furnishingstatus = "semi-furnished".to_string();
        let mut third = base.clone();
        third.furnishingstatus = "unfurnished".to_string();
        vec![base, flipped, third]
    }

    #[test]
    fn encodes_the_reference_scenario() {
        // area 5000, bedrooms 3, bathrooms 1, stories 1, parking 0,
        // mainroad yes, everything else no / reference.
        let records = corpus();
        let schema = FeatureSchema::from_records(&records).unwrap();
        let table = encode_records(&schema, &records[..1]).unwrap();

        let row = &table.rows[0];
        let idx = |name: &str| table.column_index(name).unwrap();

        assert_eq!(row[idx("area")], 5000.0);
        assert_eq!(row[idx("bedrooms")], 3.0);
        assert_eq!(row[idx("mainroad_yes")], 1.0);

        // Every other dummy column is zero.
        for (name, value) in table.columns.iter().zip(row.iter()) {
            let is_dummy = name.contains('_');
            if is_dummy && name != "mainroad_yes" {
                assert_eq!(*value, 0.0, "expected 0 in {name}");
            }
        }
    }

    #[test]
    fn batch_encoding_matches_manifest_width() {
        let records = corpus();
        let schema = FeatureSchema::from_records(&records).unwrap();
        let table = encode_records(&schema, &records).unwrap();

        assert_eq!(table.n_rows(), records.len());
        assert_eq!(table.n_columns(), schema.manifest().len());
        for row in &table.rows {
            assert_eq!(row.len(), table.n_columns());
        }
    }

    #[test]
    fn unknown_level_is_rejected() {
        let records = corpus();
        let schema = FeatureSchema::from_records(&records).unwrap();

        let mut unseen = records[0].clone();
        unseen.furnishingstatus = "palatial".to_string();

        let err = encode_record(&schema, &unseen).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::UnknownLevel { ref field, ref value }
                if field == "furnishingstatus" && value == "palatial"
        ));
    }

    #[test]
    fn encoding_is_deterministic() {
        let records = corpus();
        let schema = FeatureSchema::from_records(&records).unwrap();

        let first = encode_record(&schema, &records[1]).unwrap();
        let second = encode_record(&schema, &records[1]).unwrap();
        assert_eq!(first, second);
    }
}
