use crate::Dialect;
use crate::error::Result;

/// One row per non-internal schema/namespace in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRow {
    pub name: String,
}

/// One row per table, ordered by name within its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub name: String,
    pub schema_name: String,
}

/// One row per column, in ordinal order. `is_nullable`/`is_primary` are
/// already normalized to `bool` by the dialect crate before this row is
/// constructed (catalogs often report them as `"YES"`/`"NO"` text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRow {
    pub schema_name: String,
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub is_primary: bool,
    pub default_value: String,
}

/// One row per (table, index, column) triple, in index-column order. Rows
/// sharing `(schema_name, table_name, index_name)` are merged by the
/// introspector into a single `Index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub schema_name: String,
    pub table_name: String,
    pub index_name: String,
    pub column_name: String,
    pub is_unique: bool,
    pub is_primary: bool,
}

/// One row per (table, constraint, column) triple, in ordinal order. Rows
/// sharing `(schema_name, table_name, constraint_name)` are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRow {
    pub schema_name: String,
    pub table_name: String,
    pub constraint_name: String,
    pub column_name: String,
    pub foreign_table: String,
    pub foreign_column: String,
    pub on_delete: String,
    pub on_update: String,
}

/// One row per sequence. Empty for dialects without sequences (SQLite).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRow {
    pub name: String,
    pub schema_name: String,
    pub start_value: i64,
    pub min_value: i64,
    pub max_value: i64,
    pub increment: i64,
    pub is_cyclic: bool,
}

/// One row per sequence ownership link. Empty where not applicable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceOwnershipRow {
    pub sequence_schema: String,
    pub sequence_name: String,
    pub table_schema: String,
    pub table_name: String,
    pub column_name: String,
}

/// An opaque connection abstraction capable of running the seven metadata
/// queries the introspector needs and reporting its dialect. Connection
/// construction and credential handling are the caller's responsibility;
/// this trait only exposes the query surface.
///
/// Implementations must be safe to call from multiple threads concurrently
/// for different query categories (the introspector fans out across all
/// seven at once), though no single method is called more than once per
/// `introspect` invocation.
pub trait ConnectionHandle: Send + Sync {
    fn dialect(&self) -> Dialect;

    fn fetch_schemas(&self) -> Result<Vec<SchemaRow>>;
    fn fetch_tables(&self) -> Result<Vec<TableRow>>;
    fn fetch_columns(&self) -> Result<Vec<ColumnRow>>;
    fn fetch_indexes(&self) -> Result<Vec<IndexRow>>;
    fn fetch_foreign_keys(&self) -> Result<Vec<ForeignKeyRow>>;
    fn fetch_sequences(&self) -> Result<Vec<SequenceRow>>;
    fn fetch_sequence_ownership(&self) -> Result<Vec<SequenceOwnershipRow>>;
}
