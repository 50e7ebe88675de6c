use std::collections::BTreeMap;

use crate::ir::{Column, ForeignKey, Index, Sequence};

/// A flat, categorized structural delta between two `SchemaSet`s.
///
/// All list fields may be empty. `summary` counts always equal the length
/// of the corresponding list — see `diff::compare::diff`'s summary pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDiff {
    pub schemas_added: Vec<String>,
    pub schemas_removed: Vec<String>,
    pub schemas_same: Vec<String>,

    pub tables_added: Vec<TableDiff>,
    pub tables_removed: Vec<TableDiff>,
    pub tables_modified: Vec<TableDiff>,
    pub tables_same: Vec<String>,

    pub sequences_added: Vec<Sequence>,
    pub sequences_removed: Vec<Sequence>,
    pub sequences_modified: Vec<SequenceChange>,
    pub sequences_same: Vec<String>,

    pub summary: BTreeMap<String, usize>,
}

/// The per-table delta. `tables_added`/`tables_removed` entries have every
/// column/index/FK populated in the corresponding `added`/`removed` list;
/// `tables_modified` entries carry the actual per-child deltas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableDiff {
    pub name: String,
    pub schema_name: String,

    pub columns_added: Vec<Column>,
    pub columns_removed: Vec<Column>,
    pub columns_modified: Vec<ColumnChange>,
    pub columns_same: Vec<Column>,

    pub indexes_added: Vec<Index>,
    pub indexes_removed: Vec<Index>,
    pub indexes_modified: Vec<IndexChange>,
    pub indexes_same: Vec<Index>,

    pub foreign_keys_added: Vec<ForeignKey>,
    pub foreign_keys_removed: Vec<ForeignKey>,
    pub foreign_keys_modified: Vec<ForeignKeyChange>,
    pub foreign_keys_same: Vec<ForeignKey>,
}

impl TableDiff {
    /// A `TableDiff` is *same* only when every child category is empty —
    /// the classifier must check all eight lists, not just columns.
    pub fn is_unchanged(&self) -> bool {
        self.columns_added.is_empty()
            && self.columns_removed.is_empty()
            && self.columns_modified.is_empty()
            && self.indexes_added.is_empty()
            && self.indexes_removed.is_empty()
            && self.indexes_modified.is_empty()
            && self.foreign_keys_added.is_empty()
            && self.foreign_keys_removed.is_empty()
            && self.foreign_keys_modified.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnChange {
    pub name: String,
    pub source: Column,
    pub target: Column,
    pub changed_attributes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexChange {
    pub name: String,
    pub source: Index,
    pub target: Index,
    pub changed_attributes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyChange {
    pub name: String,
    pub source: ForeignKey,
    pub target: ForeignKey,
    pub changed_attributes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceChange {
    pub name: String,
    pub schema_name: String,
    pub source: Sequence,
    pub target: Sequence,
    pub changed_attributes: Vec<String>,
}
