use std::sync::Mutex;

use rusqlite::{Connection, Row};
use schemadiff_core::introspect::handle::{
    ColumnRow, ConnectionHandle, ForeignKeyRow, IndexRow, SchemaRow, SequenceOwnershipRow,
    SequenceRow, TableRow,
};
use schemadiff_core::{ConnectionConfig, Dialect, Error, Result};
use tracing::debug;

use crate::queries;

/// A sqlite connection handle. `rusqlite::Connection` is `Send` but not
/// `Sync`; the introspector calls each `fetch_*` method from its own thread,
/// so access is serialized behind a `Mutex` the same as the other dialects.
pub struct SqliteHandle {
    connection: Mutex<Connection>,
}

pub fn connect(config: &ConnectionConfig) -> std::result::Result<SqliteHandle, rusqlite::Error> {
    let connection = Connection::open(&config.database)?;
    Ok(SqliteHandle {
        connection: Mutex::new(connection),
    })
}

fn query<T>(
    connection: &Mutex<Connection>,
    sql: &'static str,
    label: &'static str,
    mut row_fn: impl FnMut(&Row) -> Result<T>,
) -> Result<Vec<T>> {
    debug!(query = label, "running sqlite catalog query");
    let connection = connection
        .lock()
        .expect("sqlite connection mutex poisoned");
    let mut statement = connection
        .prepare(sql)
        .map_err(|source| Error::IntrospectionFailed {
            query: label,
            source: Box::new(source),
        })?;
    let mut rows = statement
        .query([])
        .map_err(|source| Error::IntrospectionFailed {
            query: label,
            source: Box::new(source),
        })?;

    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(|source| Error::IntrospectionFailed {
        query: label,
        source: Box::new(source),
    })? {
        out.push(row_fn(row)?);
    }
    Ok(out)
}

fn get_string(row: &Row, idx: &str) -> Result<String> {
    row.get(idx).map_err(|source| Error::MalformedCatalog {
        detail: format!("column `{idx}`: {source}"),
    })
}

fn get_bool(row: &Row, idx: &str) -> Result<bool> {
    row.get(idx).map_err(|source| Error::MalformedCatalog {
        detail: format!("column `{idx}`: {source}"),
    })
}

fn get_string_or_empty(row: &Row, idx: &str) -> Result<String> {
    let value: Option<String> = row.get(idx).map_err(|source| Error::MalformedCatalog {
        detail: format!("column `{idx}`: {source}"),
    })?;
    Ok(value.unwrap_or_default())
}

impl ConnectionHandle for SqliteHandle {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn fetch_schemas(&self) -> Result<Vec<SchemaRow>> {
        query(&self.connection, queries::SCHEMA, "schema", |row| {
            Ok(SchemaRow {
                name: get_string(row, "schema_name")?,
            })
        })
    }

    fn fetch_tables(&self) -> Result<Vec<TableRow>> {
        query(&self.connection, queries::TABLE, "table", |row| {
            Ok(TableRow {
                name: get_string(row, "name")?,
                schema_name: get_string(row, "schema_name")?,
            })
        })
    }

    fn fetch_columns(&self) -> Result<Vec<ColumnRow>> {
        query(&self.connection, queries::COLUMN, "column", |row| {
            Ok(ColumnRow {
                schema_name: "main".to_string(),
                table_name: get_string(row, "table_name")?,
                column_name: get_string(row, "column_name")?,
                data_type: get_string(row, "data_type")?,
                is_nullable: get_bool(row, "is_nullable")?,
                is_primary: get_bool(row, "is_primary")?,
                default_value: get_string_or_empty(row, "default_value")?,
            })
        })
    }

    fn fetch_indexes(&self) -> Result<Vec<IndexRow>> {
        query(&self.connection, queries::INDEX, "index", |row| {
            Ok(IndexRow {
                schema_name: "main".to_string(),
                table_name: get_string(row, "table_name")?,
                index_name: get_string(row, "index_name")?,
                column_name: get_string(row, "column_name")?,
                is_unique: get_bool(row, "is_unique")?,
                is_primary: get_bool(row, "is_primary")?,
            })
        })
    }

    fn fetch_foreign_keys(&self) -> Result<Vec<ForeignKeyRow>> {
        query(&self.connection, queries::FOREIGN_KEY, "foreign_key", |row| {
            Ok(ForeignKeyRow {
                schema_name: "main".to_string(),
                table_name: get_string(row, "table_name")?,
                constraint_name: get_string(row, "constraint_name")?,
                column_name: get_string(row, "column_name")?,
                foreign_table: get_string(row, "foreign_table")?,
                foreign_column: get_string(row, "foreign_column")?,
                on_delete: get_string_or_empty(row, "on_delete")?,
                on_update: get_string_or_empty(row, "on_update")?,
            })
        })
    }

    /// SQLite has no sequence objects; this always returns an empty result.
    fn fetch_sequences(&self) -> Result<Vec<SequenceRow>> {
        Ok(Vec::new())
    }

    fn fetch_sequence_ownership(&self) -> Result<Vec<SequenceOwnershipRow>> {
        Ok(Vec::new())
    }
}
