//! The canonical, dialect-independent schema representation.
//!
//! Every type here is a plain value: clonable, comparable by field, owning no
//! connection or resource. `SchemaSet` is produced once by introspection and
//! never mutated afterward; the differ and emitter only ever read it.

/// A full structural snapshot of one database, as a sequence of schemas.
///
/// Schema names are unique within a `SchemaSet`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemaSet {
    pub schemas: Vec<Schema>,
}

impl SchemaSet {
    pub fn new(schemas: Vec<Schema>) -> Self {
        Self { schemas }
    }

    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.name == name)
    }
}

/// A named namespace containing tables and sequences.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schema {
    pub name: String,
    pub tables: Vec<Table>,
    pub sequences: Vec<Sequence>,
}

/// A table, keyed by `(schema_name, name)` across a `SchemaSet`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub schema_name: String,
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
    pub foreign_keys: Vec<ForeignKey>,
}

/// A column. Order within `Table::columns` is significant: it mirrors the
/// catalog's `ordinal_position` and governs emitted `CREATE TABLE` order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub is_primary: bool,
    /// Empty string when the column has no default.
    pub default: String,
}

/// An index. Column order is significant for composite indexes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
    pub is_unique: bool,
    pub is_primary: bool,
}

/// A foreign key constraint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ForeignKey {
    pub name: String,
    pub columns: Vec<String>,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
    /// One of `NO ACTION`, `RESTRICT`, `CASCADE`, `SET NULL`, `SET DEFAULT`.
    pub on_delete: String,
    pub on_update: String,
}

/// A sequence, optionally owned by a table column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sequence {
    pub name: String,
    pub schema_name: String,
    pub start_value: i64,
    pub min_value: i64,
    pub max_value: i64,
    pub increment: i64,
    pub is_cyclic: bool,
    /// Empty if the sequence is unowned.
    pub owned_by_table: String,
    pub owned_by_column: String,
}

/// The default `NO ACTION` referential action, used when a catalog row omits
/// an explicit `ON DELETE`/`ON UPDATE` rule.
pub const NO_ACTION: &str = "NO ACTION";
