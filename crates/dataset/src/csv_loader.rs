//! Training CSV ingestion
//!
//! Loads the housing corpus and drops incomplete rows, mirroring the
//! batch pipeline's "remove missing values" step.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::{info, warn};

use crate::record::{HouseRecord, TrainingExample, CATEGORICAL_FIELDS, NUMERIC_FIELDS, TARGET_FIELD};

/// Errors while loading the training corpus.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse CSV: {0}")]
    Csv(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("No complete rows in input")]
    Empty,
}

/// A loaded training corpus.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Complete labeled rows
    pub examples: Vec<TrainingExample>,
    /// Rows dropped for missing or unparseable fields
    pub skipped: usize,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}

/// Load a training CSV with the twelve feature columns and the price
/// column. Rows with any empty or unparseable cell are dropped and
/// counted, not reported as errors.
pub fn load_training_csv(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::FileNotFound(format!("{}: {e}", path.display())))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let headers = reader
        .headers()
        .map_err(|e| LoadError::Csv(e.to_string()))?
        .clone();

    let mut columns: HashMap<&str, usize> = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        columns.insert(name, idx);
    }

    let mut required: Vec<&str> = Vec::new();
    required.extend(NUMERIC_FIELDS);
    required.extend(CATEGORICAL_FIELDS);
    required.push(TARGET_FIELD);
    for name in &required {
        if !columns.contains_key(name) {
            return Err(LoadError::MissingColumn((*name).to_string()));
        }
    }

    let mut examples = Vec::new();
    let mut skipped = 0usize;

    for result in reader.records() {
        let row = result.map_err(|e| LoadError::Csv(e.to_string()))?;
        match parse_row(&row, &columns) {
            Some(example) => examples.push(example),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Dropped {} incomplete rows from {}", skipped, path.display());
    }

    if examples.is_empty() {
        return Err(LoadError::Empty);
    }

    info!("Loaded {} rows from {}", examples.len(), path.display());

    Ok(Dataset { examples, skipped })
}

fn cell<'a>(row: &'a csv::StringRecord, columns: &HashMap<&str, usize>, name: &str) -> Option<&'a str> {
    let value = row.get(*columns.get(name)?)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_row(row: &csv::StringRecord, columns: &HashMap<&str, usize>) -> Option<TrainingExample> {
    let features = HouseRecord {
        area: cell(row, columns, "area")?.parse().ok()?,
        bedrooms: cell(row, columns, "bedrooms")?.parse().ok()?,
        bathrooms: cell(row, columns, "bathrooms")?.parse().ok()?,
        stories: cell(row, columns, "stories")?.parse().ok()?,
        parking: cell(row, columns, "parking")?.parse().ok()?,
        mainroad: cell(row, columns, "mainroad")?.to_string(),
        guestroom: cell(row, columns, "guestroom")?.to_string(),
        basement: cell(row, columns, "basement")?.to_string(),
        hotwaterheating: cell(row, columns, "hotwaterheating")?.to_string(),
        airconditioning: cell(row, columns, "airconditioning")?.to_string(),
        prefarea: cell(row, columns, "prefarea")?.to_string(),
        furnishingstatus: cell(row, columns, "furnishingstatus")?.to_string(),
    };
    let price: f64 = cell(row, columns, TARGET_FIELD)?.parse().ok()?;

    Some(TrainingExample { features, price })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "price,area,bedrooms,bathrooms,stories,mainroad,guestroom,basement,hotwaterheating,airconditioning,parking,prefarea,furnishingstatus";

    fn write_csv(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file
    }

    #[test]
    fn loads_complete_rows() {
        let file = write_csv(&[
            "13300000,7420,4,2,3,yes,no,no,no,yes,2,yes,furnished",
            "12250000,8960,4,4,4,yes,no,no,no,yes,3,no,furnished",
        ]);

        let dataset = load_training_csv(file.path()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.skipped, 0);
        assert_eq!(dataset.examples[0].price, 13_300_000.0);
        assert_eq!(dataset.examples[0].features.area, 7420.0);
        assert_eq!(dataset.examples[1].features.parking, 3);
    }

    #[test]
    fn drops_rows_with_missing_or_bad_cells() {
        let file = write_csv(&[
            "13300000,7420,4,2,3,yes,no,no,no,yes,2,yes,furnished",
            "12250000,,4,4,4,yes,no,no,no,yes,3,no,furnished",
            "not-a-price,8960,4,4,4,yes,no,no,no,yes,3,no,furnished",
        ]);

        let dataset = load_training_csv(file.path()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.skipped, 2);
    }

    #[test]
    fn rejects_missing_column() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "price,area").unwrap();
        writeln!(file, "100,200").unwrap();

        let err = load_training_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(_)));
    }

    #[test]
    fn all_rows_incomplete_is_an_error() {
        let file = write_csv(&[",,,,,,,,,,,,"]);
        let err = load_training_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Empty));
    }
}
