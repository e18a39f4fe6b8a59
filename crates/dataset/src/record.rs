//! Raw housing record model

use serde::{Deserialize, Serialize};

/// Numeric attribute names, in encoding order.
pub const NUMERIC_FIELDS: [&str; 5] = ["area", "bedrooms", "bathrooms", "stories", "parking"];

/// Categorical attribute names, in encoding order.
pub const CATEGORICAL_FIELDS: [&str; 7] = [
    "mainroad",
    "guestroom",
    "basement",
    "hotwaterheating",
    "airconditioning",
    "prefarea",
    "furnishingstatus",
];

/// Name of the training target column.
pub const TARGET_FIELD: &str = "price";

/// A raw house listing: five numeric attributes and seven categorical
/// flags. This is the wire shape of the REST predict body and the row
/// shape of the training CSV (minus the price column).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseRecord {
    /// Living area in square feet
    pub area: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub stories: u32,
    /// Number of parking spots
    pub parking: u32,
    /// "yes" / "no"
    pub mainroad: String,
    pub guestroom: String,
    pub basement: String,
    pub hotwaterheating: String,
    pub airconditioning: String,
    pub prefarea: String,
    /// "furnished" / "semi-furnished" / "unfurnished"
    pub furnishingstatus: String,
}

impl HouseRecord {
    /// Numeric attributes paired with their field names, in the order of
    /// [`NUMERIC_FIELDS`].
    pub fn numeric_values(&self) -> [(&'static str, f64); 5] {
        [
            ("area", self.area),
            ("bedrooms", f64::from(self.bedrooms)),
            ("bathrooms", f64::from(self.bathrooms)),
            ("stories", f64::from(self.stories)),
            ("parking", f64::from(self.parking)),
        ]
    }

    /// Categorical attributes paired with their field names, in the order
    /// of [`CATEGORICAL_FIELDS`].
    pub fn categorical_values(&self) -> [(&'static str, &str); 7] {
        [
            ("mainroad", self.mainroad.as_str()),
            ("guestroom", self.guestroom.as_str()),
            ("basement", self.basement.as_str()),
            ("hotwaterheating", self.hotwaterheating.as_str()),
            ("airconditioning", self.airconditioning.as_str()),
            ("prefarea", self.prefarea.as_str()),
            ("furnishingstatus", self.furnishingstatus.as_str()),
        ]
    }
}

/// One labeled training row: the raw features plus the observed sale price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    #[serde(flatten)]
    pub features: HouseRecord,
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HouseRecord {
        HouseRecord {
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
        }
    }

    #[test]
    fn numeric_values_follow_field_order() {
        let record = sample();
        let values = record.numeric_values();
        for (i, (name, _)) in values.iter().enumerate() {
            assert_eq!(*name, NUMERIC_FIELDS[i]);
        }
        assert_eq!(values[0].1, 5000.0);
        assert_eq!(values[4].1, 0.0);
    }

    #[test]
    fn categorical_values_follow_field_order() {
        let record = sample();
        let values = record.categorical_values();
        for (i, (name, _)) in values.iter().enumerate() {
            assert_eq!(*name, CATEGORICAL_FIELDS[i]);
        }
        assert_eq!(values[0].1, "yes");
        assert_eq!(values[6].1, "furnished");
    }

    #[test]
    fn record_roundtrips_through_json() {
        let record = sample();
        let json = serde_json::to_string(&record).unwrap();
        let back: HouseRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
