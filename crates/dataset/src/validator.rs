//! Range checks for raw records

use serde::{Deserialize, Serialize};

use crate::record::HouseRecord;

/// Errors during record validation
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Area valid range (sq ft)
    pub area_range: (f64, f64),
    /// Bedroom count valid range
    pub bedrooms_range: (f64, f64),
    /// Bathroom count valid range
    pub bathrooms_range: (f64, f64),
    /// Story count valid range
    pub stories_range: (f64, f64),
    /// Parking spot valid range
    pub parking_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            area_range: (100.0, 100_000.0),
            bedrooms_range: (1.0, 10.0),
            bathrooms_range: (1.0, 5.0),
            stories_range: (1.0, 5.0),
            parking_range: (0.0, 5.0),
        }
    }
}

/// Validator for the numeric attributes of a raw record
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate every numeric attribute of a record, collecting all
    /// violations.
    pub fn validate_record(&self, record: &HouseRecord) -> Vec<ValidationError> {
        let checks = [
            ("area", record.area, self.config.area_range),
            ("bedrooms", f64::from(record.bedrooms), self.config.bedrooms_range),
            ("bathrooms", f64::from(record.bathrooms), self.config.bathrooms_range),
            ("stories", f64::from(record.stories), self.config.stories_range),
            ("parking", f64::from(record.parking), self.config.parking_range),
        ];

        checks
            .into_iter()
            .filter_map(|(field, value, range)| self.validate_range(field, value, range).err())
            .collect()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
