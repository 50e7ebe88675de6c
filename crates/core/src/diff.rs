//! Structural diffing: `diff(source, target) -> SchemaDiff`.
//!
//! Pure, total, no I/O. Entities are matched by name at every granularity;
//! rename detection is deliberately not performed — a rename surfaces as one
//! remove and one add.

pub mod compare;
pub mod types;

pub use compare::diff;
pub use types::{
    ColumnChange, ForeignKeyChange, IndexChange, SchemaDiff, SequenceChange, TableDiff,
};
