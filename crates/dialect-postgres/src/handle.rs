use std::sync::Mutex;

use postgres::{Client, NoTls, Row};
use schemadiff_core::introspect::handle::{
    ColumnRow, ConnectionHandle, ForeignKeyRow, IndexRow, SchemaRow, SequenceOwnershipRow,
    SequenceRow, TableRow,
};
use schemadiff_core::introspect::normalize_bool;
use schemadiff_core::{ConnectionConfig, Dialect, Error, Result};
use tracing::debug;

use crate::queries;

/// A postgres connection handle. The underlying `Client` is not `Sync` on
/// its own, so it is held behind a `Mutex` — the introspector calls each
/// `fetch_*` method from its own thread, and each call takes the lock only
/// for the duration of one query.
pub struct PostgresHandle {
    client: Mutex<Client>,
}

pub fn connect(config: &ConnectionConfig) -> std::result::Result<PostgresHandle, postgres::Error> {
    let mut builder = postgres::Config::new();
    if let Some(host) = &config.host {
        builder.host(host);
    }
    if let Some(port) = config.port {
        builder.port(port);
    }
    if let Some(user) = &config.user {
        builder.user(user);
    }
    if let Some(password) = &config.password {
        builder.password(password);
    }
    builder.dbname(&config.database);
    let client = builder.connect(NoTls)?;
    Ok(PostgresHandle {
        client: Mutex::new(client),
    })
}

fn query(client: &Mutex<Client>, sql: &'static str, label: &'static str) -> Result<Vec<Row>> {
    debug!(query = label, "running postgres catalog query");
    let mut client = client.lock().expect("postgres client mutex poisoned");
    client
        .query(sql, &[])
        .map_err(|source| Error::IntrospectionFailed {
            query: label,
            source: Box::new(source),
        })
}

fn get_bool(row: &Row, idx: &str) -> Result<bool> {
    // `is_nullable`/`cycle_option` surface as text in information_schema;
    // `is_unique`/`is_primary`/`indisprimary` already surface as real bools
    // from pg_catalog. Try bool first, fall back to text normalization.
    if let Ok(value) = row.try_get::<_, bool>(idx) {
        return Ok(value);
    }
    let text: String = row
        .try_get(idx)
        .map_err(|source| Error::MalformedCatalog {
            detail: format!("column `{idx}`: {source}"),
        })?;
    Ok(normalize_bool(&text))
}

fn get_string(row: &Row, idx: &str) -> Result<String> {
    row.try_get(idx).map_err(|source| Error::MalformedCatalog {
        detail: format!("column `{idx}`: {source}"),
    })
}

fn get_i64(row: &Row, idx: &str) -> Result<i64> {
    if let Ok(value) = row.try_get::<_, i64>(idx) {
        return Ok(value);
    }
    let text: String = row
        .try_get(idx)
        .map_err(|source| Error::MalformedCatalog {
            detail: format!("column `{idx}`: {source}"),
        })?;
    text.parse().map_err(|_| Error::MalformedCatalog {
        detail: format!("column `{idx}` is not an integer: {text}"),
    })
}

impl ConnectionHandle for PostgresHandle {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn fetch_schemas(&self) -> Result<Vec<SchemaRow>> {
        query(&self.client, queries::SCHEMA, "schema")?
            .iter()
            .map(|row| {
                Ok(SchemaRow {
                    name: get_string(row, "schema_name")?,
                })
            })
            .collect()
    }

    fn fetch_tables(&self) -> Result<Vec<TableRow>> {
        query(&self.client, queries::TABLE, "table")?
            .iter()
            .map(|row| {
                Ok(TableRow {
                    name: get_string(row, "name")?,
                    schema_name: get_string(row, "schema_name")?,
                })
            })
            .collect()
    }

    fn fetch_columns(&self) -> Result<Vec<ColumnRow>> {
        query(&self.client, queries::COLUMN, "column")?
            .iter()
            .map(|row| {
                Ok(ColumnRow {
                    schema_name: get_string(row, "table_schema")?,
                    table_name: get_string(row, "table_name")?,
                    column_name: get_string(row, "column_name")?,
                    data_type: get_string(row, "data_type")?,
                    is_nullable: get_bool(row, "is_nullable")?,
                    is_primary: get_bool(row, "is_primary")?,
                    default_value: get_string(row, "default_value")?,
                })
            })
            .collect()
    }

    fn fetch_indexes(&self) -> Result<Vec<IndexRow>> {
        query(&self.client, queries::INDEX, "index")?
            .iter()
            .map(|row| {
                Ok(IndexRow {
                    schema_name: get_string(row, "schema_name")?,
                    table_name: get_string(row, "table_name")?,
                    index_name: get_string(row, "index_name")?,
                    column_name: get_string(row, "column_name")?,
                    is_unique: get_bool(row, "is_unique")?,
                    is_primary: get_bool(row, "is_primary")?,
                })
            })
            .collect()
    }

    fn fetch_foreign_keys(&self) -> Result<Vec<ForeignKeyRow>> {
        query(&self.client, queries::FOREIGN_KEY, "foreign_key")?
            .iter()
            .map(|row| {
                Ok(ForeignKeyRow {
                    schema_name: get_string(row, "table_schema")?,
                    table_name: get_string(row, "table_name")?,
                    constraint_name: get_string(row, "constraint_name")?,
                    column_name: get_string(row, "column_name")?,
                    foreign_table: get_string(row, "foreign_table")?,
                    foreign_column: get_string(row, "foreign_column")?,
                    on_delete: get_string(row, "on_delete")?,
                    on_update: get_string(row, "on_update")?,
                })
            })
            .collect()
    }

    fn fetch_sequences(&self) -> Result<Vec<SequenceRow>> {
        query(&self.client, queries::SEQUENCE, "sequence")?
            .iter()
            .map(|row| {
                Ok(SequenceRow {
                    name: get_string(row, "name")?,
                    schema_name: get_string(row, "schema_name")?,
                    start_value: get_i64(row, "start_value")?,
                    min_value: get_i64(row, "minimum_value")?,
                    max_value: get_i64(row, "maximum_value")?,
                    increment: get_i64(row, "increment")?,
                    is_cyclic: get_bool(row, "is_cyclic")?,
                })
            })
            .collect()
    }

    fn fetch_sequence_ownership(&self) -> Result<Vec<SequenceOwnershipRow>> {
        query(
            &self.client,
            queries::SEQUENCE_OWNERSHIP,
            "sequence_ownership",
        )?
        .iter()
        .map(|row| {
            Ok(SequenceOwnershipRow {
                sequence_schema: get_string(row, "sequence_schema")?,
                sequence_name: get_string(row, "sequence_name")?,
                table_schema: get_string(row, "table_schema")?,
                table_name: get_string(row, "table_name")?,
                column_name: get_string(row, "column_name")?,
            })
        })
        .collect()
    }
}
