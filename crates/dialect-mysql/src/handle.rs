use std::collections::HashMap;
use std::sync::Mutex;

use mysql::prelude::Queryable;
use mysql::{Opts, OptsBuilder, Pool, PooledConn, Row};
use schemadiff_core::introspect::handle::{
    ColumnRow, ConnectionHandle, ForeignKeyRow, IndexRow, SchemaRow, SequenceOwnershipRow,
    SequenceRow, TableRow,
};
use schemadiff_core::introspect::normalize_bool;
use schemadiff_core::{ConnectionConfig, Dialect, Error, Result};
use tracing::debug;

use crate::queries;

/// A mysql connection handle, backed by a pooled sync connection. Held
/// behind a `Mutex` for the same reason as the postgres handle: the
/// introspector fans out across threads and each call needs exclusive use
/// of the connection for its own query.
pub struct MysqlHandle {
    conn: Mutex<PooledConn>,
}

pub fn connect(config: &ConnectionConfig) -> std::result::Result<MysqlHandle, mysql::Error> {
    let mut builder = OptsBuilder::new();
    if let Some(host) = &config.host {
        builder = builder.ip_or_hostname(Some(host.clone()));
    }
    if let Some(port) = config.port {
        builder = builder.tcp_port(port);
    }
    if let Some(user) = &config.user {
        builder = builder.user(Some(user.clone()));
    }
    if let Some(password) = &config.password {
        builder = builder.pass(Some(password.clone()));
    }
    builder = builder.db_name(Some(config.database.clone()));
    let pool = Pool::new(Opts::from(builder))?;
    let conn = pool.get_conn()?;
    Ok(MysqlHandle {
        conn: Mutex::new(conn),
    })
}

fn query(conn: &Mutex<PooledConn>, sql: &'static str, label: &'static str) -> Result<Vec<Row>> {
    debug!(query = label, "running mysql catalog query");
    let mut conn = conn.lock().expect("mysql connection mutex poisoned");
    conn.query(sql)
        .map_err(|source| Error::IntrospectionFailed {
            query: label,
            source: Box::new(source),
        })
}

fn get_bool(row: &Row, idx: &str) -> Result<bool> {
    if let Some(value) = row.get::<i64, _>(idx) {
        return Ok(value != 0);
    }
    let text: String = row.get(idx).ok_or_else(|| Error::MalformedCatalog {
        detail: format!("column `{idx}` missing or not text"),
    })?;
    Ok(normalize_bool(&text))
}

fn get_string(row: &Row, idx: &str) -> Result<String> {
    row.get::<Option<String>, _>(idx)
        .ok_or_else(|| Error::MalformedCatalog {
            detail: format!("column `{idx}` missing"),
        })
        .map(|value| value.unwrap_or_default())
}

impl ConnectionHandle for MysqlHandle {
    fn dialect(&self) -> Dialect {
        Dialect::Mysql
    }

    fn fetch_schemas(&self) -> Result<Vec<SchemaRow>> {
        query(&self.conn, queries::SCHEMA, "schema")?
            .iter()
            .map(|row| {
                Ok(SchemaRow {
                    name: get_string(row, "schema_name")?,
                })
            })
            .collect()
    }

    fn fetch_tables(&self) -> Result<Vec<TableRow>> {
        query(&self.conn, queries::TABLE, "table")?
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
        query(&self.conn, queries::COLUMN, "column")?
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
        query(&self.conn, queries::INDEX, "index")?
            .iter()
            .map(|row| {
                Ok(IndexRow {
                    schema_name: get_string(row, "table_schema")?,
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
        let rule_rows = query(&self.conn, queries::FOREIGN_KEY_RULES, "foreign_key_rules")?;
        let mut rules: HashMap<String, (String, String)> = HashMap::new();
        for row in &rule_rows {
            let name = get_string(row, "constraint_name")?;
            let delete_rule = get_string(row, "delete_rule")?;
            let update_rule = get_string(row, "update_rule")?;
            rules.insert(name, (delete_rule, update_rule));
        }

        query(&self.conn, queries::FOREIGN_KEY, "foreign_key")?
            .iter()
            .map(|row| {
                let constraint_name = get_string(row, "constraint_name")?;
                let (on_delete, on_update) = rules
                    .get(&constraint_name)
                    .cloned()
                    .unwrap_or_else(|| (String::new(), String::new()));
                Ok(ForeignKeyRow {
                    schema_name: get_string(row, "table_schema")?,
                    table_name: get_string(row, "table_name")?,
                    constraint_name,
                    column_name: get_string(row, "column_name")?,
                    foreign_table: get_string(row, "foreign_table")?,
                    foreign_column: get_string(row, "foreign_column")?,
                    on_delete,
                    on_update,
                })
            })
            .collect()
    }

    /// MySQL has no real sequences; this always returns an empty result
    /// without issuing a query, matching SQLite's empty-result approach.
    fn fetch_sequences(&self) -> Result<Vec<SequenceRow>> {
        Ok(Vec::new())
    }

    fn fetch_sequence_ownership(&self) -> Result<Vec<SequenceOwnershipRow>> {
        Ok(Vec::new())
    }
}
