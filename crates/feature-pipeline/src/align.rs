//! Column alignment against the training manifest
//!
//! The manifest is the ordered column list frozen at training time and the
//! single source of truth for what the scaler and the model expect. Any
//! encoded table is reconciled against it before scaling: manifest columns
//! missing from the table are zero-filled, extra columns are dropped, and
//! the output order is exactly the manifest order. A single-row inference
//! request zero-fills most dummy columns; that is the normal path.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::encode::EncodedTable;

/// The ordered encoded-column names fixed at training time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnManifest {
    columns: Vec<String>,
}

impl ColumnManifest {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<String> {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Align a table to the manifest: zero-fill absent manifest columns, then
/// select and reorder so the output columns equal the manifest exactly.
pub fn align(table: &EncodedTable, manifest: &ColumnManifest) -> EncodedTable {
    let source: Vec<Option<usize>> = manifest
        .columns()
        .iter()
        .map(|name| table.column_index(name))
        .collect();

    let missing = source.iter().filter(|s| s.is_none()).count();
    if missing > 0 {
        debug!("Zero-filling {missing} manifest columns absent from input");
    }

    let rows = table
        .rows
        .iter()
        .map(|row| {
            source
                .iter()
                .map(|idx| idx.map_or(0.0, |i| row[i]))
                .collect()
        })
        .collect();

    EncodedTable {
        columns: manifest.columns().to_vec(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table(columns: &[&str], rows: &[&[f64]]) -> EncodedTable {
        EncodedTable {
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            rows: rows.iter().map(|r| r.to_vec()).collect(),
        }
    }

    fn manifest(columns: &[&str]) -> ColumnManifest {
        ColumnManifest::new(columns.iter().map(|c| (*c).to_string()).collect())
    }

    #[test]
    fn zero_fills_missing_columns() {
        let input = table(&["area", "mainroad_yes"], &[&[5000.0, 1.0]]);
        let manifest = manifest(&["area", "mainroad_yes", "basement_yes"]);

        let aligned = align(&input, &manifest);
        assert_eq!(aligned.columns, manifest.columns());
        assert_eq!(aligned.rows, vec![vec![5000.0, 1.0, 0.0]]);
    }

    #[test]
    fn drops_columns_not_in_manifest() {
        let input = table(&["area", "stray"], &[&[5000.0, 9.9]]);
        let manifest = manifest(&["area"]);

        let aligned = align(&input, &manifest);
        assert_eq!(aligned.columns, vec!["area".to_string()]);
        assert_eq!(aligned.rows, vec![vec![5000.0]]);
    }

    #[test]
    fn reorders_to_manifest_order() {
        let input = table(&["b", "a"], &[&[2.0, 1.0]]);
        let manifest = manifest(&["a", "b"]);

        let aligned = align(&input, &manifest);
        assert_eq!(aligned.rows, vec![vec![1.0, 2.0]]);
    }

    #[test]
    fn aligning_an_aligned_table_is_a_no_op() {
        let input = table(&["area", "mainroad_yes"], &[&[5000.0, 1.0], &[3200.0, 0.0]]);
        let manifest = manifest(&["mainroad_yes", "area"]);

        let once = align(&input, &manifest);
        let twice = align(&once, &manifest);
        assert_eq!(once, twice);
    }

    #[test]
    fn complete_input_keeps_values_identical() {
        let input = table(&["b", "a"], &[&[2.0, 1.0]]);
        let manifest = manifest(&["a", "b"]);

        let aligned = align(&input, &manifest);
        // Same values, only ordering changed.
        let a = aligned.column_index("a").unwrap();
        let b = aligned.column_index("b").unwrap();
        assert_eq!(aligned.rows[0][a], 1.0);
        assert_eq!(aligned.rows[0][b], 2.0);
    }

    const POOL: [&str; 6] = ["area", "bedrooms", "mainroad_yes", "basement_yes", "prefarea_yes", "stray"];

    fn arb_columns() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec(any::<bool>(), POOL.len()).prop_map(|mask| {
            POOL.iter()
                .zip(mask)
                .filter(|(_, keep)| *keep)
                .map(|(name, _)| (*name).to_string())
                .collect()
        })
    }

    fn arb_table() -> impl Strategy<Value = EncodedTable> {
        (arb_columns(), 0usize..4).prop_flat_map(|(columns, n_rows)| {
            let width = columns.len();
            proptest::collection::vec(
                proptest::collection::vec(-1000.0f64..1000.0, width),
                n_rows,
            )
            .prop_map(move |rows| EncodedTable {
                columns: columns.clone(),
                rows,
            })
        })
    }

    proptest! {
        #[test]
        fn aligned_columns_always_equal_manifest(input in arb_table(), manifest_cols in arb_columns()) {
            let manifest = ColumnManifest::new(manifest_cols);
            let aligned = align(&input, &manifest);

            prop_assert_eq!(aligned.columns.as_slice(), manifest.columns());
            for row in &aligned.rows {
                prop_assert_eq!(row.len(), manifest.len());
            }
        }

        #[test]
        fn alignment_is_idempotent(input in arb_table(), manifest_cols in arb_columns()) {
            let manifest = ColumnManifest::new(manifest_cols);
            let once = align(&input, &manifest);
            let twice = align(&once, &manifest);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn absent_columns_are_zero(input in arb_table(), manifest_cols in arb_columns()) {
            let manifest = ColumnManifest::new(manifest_cols);
            let aligned = align(&input, &manifest);

            for (idx, name) in manifest.columns().iter().enumerate() {
                if input.column_index(name).is_none() {
                    for row in &aligned.rows {
                        prop_assert_eq!(row[idx], 0.0);
                    }
                }
            }
        }
    }
}
