//! Feature Pipeline
//!
//! The training-time / inference-time preprocessing contract: an explicit
//! feature schema, drop-first one-hot encoding, column alignment against
//! the frozen manifest, and frozen standardization. Every serving surface
//! runs the same encode → align → scale sequence over these pieces.

mod align;
mod encode;
mod scaler;
mod schema;

pub use align::{align, ColumnManifest};
pub use encode::{encode_record, encode_records, EncodeError, EncodedTable};
pub use scaler::{ScaleError, StandardScaler};
pub use schema::{FeatureSchema, FieldKind, FieldSpec, SchemaError, SCHEMA_VERSION};
