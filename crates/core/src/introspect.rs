//! Concurrent schema extraction: `introspect(handle) -> SchemaSet`.
//!
//! Seven independent metadata queries run on their own OS thread and are
//! joined before assembly starts; the first failing task's error is
//! returned and no partial `SchemaSet` is ever produced.

pub mod handle;

use std::collections::BTreeMap;

use handle::{
    ColumnRow, ConnectionHandle, ForeignKeyRow, IndexRow, SchemaRow, SequenceOwnershipRow,
    SequenceRow, TableRow,
};

use crate::error::Result;
use crate::ir::{Column, ForeignKey, Index, Schema, SchemaSet, Sequence, Table};

/// Normalize a boolean-shaped catalog string (`"YES"`/`"NO"`, `"1"`/`"0"`,
/// `"true"`/`"false"`, case-insensitive) to a `bool`. Anything else is
/// treated as falsy; dialect crates are expected to only ever pass one of
/// the recognized shapes.
pub fn normalize_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "yes" | "y" | "1" | "true" | "t"
    )
}

/// Run the seven metadata queries concurrently and assemble a `SchemaSet`.
///
/// Tasks share no mutable state; each returns its rows by value. On first
/// error, that error is returned — other in-flight tasks are allowed to
/// finish but their results are discarded.
pub fn introspect(handle: &dyn ConnectionHandle) -> Result<SchemaSet> {
    let (schemas, tables, columns, indexes, foreign_keys, sequences, ownership) =
        std::thread::scope(|scope| {
            let schemas_task = scope.spawn(|| handle.fetch_schemas());
            let tables_task = scope.spawn(|| handle.fetch_tables());
            let columns_task = scope.spawn(|| handle.fetch_columns());
            let indexes_task = scope.spawn(|| handle.fetch_indexes());
            let fks_task = scope.spawn(|| handle.fetch_foreign_keys());
            let sequences_task = scope.spawn(|| handle.fetch_sequences());
            let ownership_task = scope.spawn(|| handle.fetch_sequence_ownership());

            let schemas = join(schemas_task);
            let tables = join(tables_task);
            let columns = join(columns_task);
            let indexes = join(indexes_task);
            let foreign_keys = join(fks_task);
            let sequences = join(sequences_task);
            let ownership = join(ownership_task);

            (
                schemas,
                tables,
                columns,
                indexes,
                foreign_keys,
                sequences,
                ownership,
            )
        });

    let schemas = schemas?;
    let tables = tables?;
    let columns = columns?;
    let indexes = indexes?;
    let foreign_keys = foreign_keys?;
    let sequences = sequences?;
    let ownership = ownership?;

    Ok(assemble(
        schemas,
        tables,
        columns,
        indexes,
        foreign_keys,
        sequences,
        ownership,
    ))
}

/// A spawned thread can only fail by panicking (our fetch closures return
/// `Result`, they don't panic in the success path); a panic here means a
/// driver bug, not a catalog error, so it is not worth modeling as part of
/// `Error` — propagate it the same way `thread::scope` would without a
/// `catch_unwind` boundary.
fn join<T>(handle: std::thread::ScopedJoinHandle<'_, Result<T>>) -> Result<T> {
    match handle.join() {
        Ok(result) => result,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

type TableKey = (String, String);

fn assemble(
    schema_rows: Vec<SchemaRow>,
    table_rows: Vec<TableRow>,
    column_rows: Vec<ColumnRow>,
    index_rows: Vec<IndexRow>,
    fk_rows: Vec<ForeignKeyRow>,
    sequence_rows: Vec<SequenceRow>,
    ownership_rows: Vec<SequenceOwnershipRow>,
) -> SchemaSet {
    let mut columns_by_table: BTreeMap<TableKey, Vec<Column>> = BTreeMap::new();
    for row in column_rows {
        let key = (row.schema_name.clone(), row.table_name.clone());
        columns_by_table.entry(key).or_default().push(Column {
            name: row.column_name,
            data_type: row.data_type,
            is_nullable: row.is_nullable,
            is_primary: row.is_primary,
            default: row.default_value,
        });
    }

    let indexes_by_table = merge_indexes(index_rows);
    let fks_by_table = merge_foreign_keys(fk_rows);

    let mut ownership_by_sequence: BTreeMap<(String, String), SequenceOwnershipRow> =
        BTreeMap::new();
    for row in ownership_rows {
        ownership_by_sequence.insert(
            (row.sequence_schema.clone(), row.sequence_name.clone()),
            row,
        );
    }

    let mut sequences_by_schema: BTreeMap<String, Vec<Sequence>> = BTreeMap::new();
    for row in sequence_rows {
        let owner = ownership_by_sequence.get(&(row.schema_name.clone(), row.name.clone()));
        sequences_by_schema
            .entry(row.schema_name.clone())
            .or_default()
            .push(Sequence {
                name: row.name,
                schema_name: row.schema_name,
                start_value: row.start_value,
                min_value: row.min_value,
                max_value: row.max_value,
                increment: row.increment,
                is_cyclic: row.is_cyclic,
                owned_by_table: owner.map(|o| o.table_name.clone()).unwrap_or_default(),
                owned_by_column: owner.map(|o| o.column_name.clone()).unwrap_or_default(),
            });
    }

    let mut tables_by_schema: BTreeMap<String, Vec<Table>> = BTreeMap::new();
    for row in table_rows {
        let key = (row.schema_name.clone(), row.name.clone());
        tables_by_schema
            .entry(row.schema_name.clone())
            .or_default()
            .push(Table {
                name: row.name,
                schema_name: row.schema_name,
                columns: columns_by_table.remove(&key).unwrap_or_default(),
                indexes: indexes_by_table.get(&key).cloned().unwrap_or_default(),
                foreign_keys: fks_by_table.get(&key).cloned().unwrap_or_default(),
            });
    }

    let schemas = schema_rows
        .into_iter()
        .map(|row| Schema {
            tables: tables_by_schema.remove(&row.name).unwrap_or_default(),
            sequences: sequences_by_schema.remove(&row.name).unwrap_or_default(),
            name: row.name,
        })
        .collect();

    SchemaSet::new(schemas)
}

fn merge_indexes(rows: Vec<IndexRow>) -> BTreeMap<TableKey, Vec<Index>> {
    let mut by_table: BTreeMap<TableKey, BTreeMap<String, Index>> = BTreeMap::new();
    let mut index_order: BTreeMap<TableKey, Vec<String>> = BTreeMap::new();

    for row in rows {
        let key = (row.schema_name.clone(), row.table_name.clone());
        let table_indexes = by_table.entry(key.clone()).or_default();
        if !table_indexes.contains_key(&row.index_name) {
            index_order
                .entry(key.clone())
                .or_default()
                .push(row.index_name.clone());
            table_indexes.insert(
                row.index_name.clone(),
                Index {
                    name: row.index_name.clone(),
                    columns: Vec::new(),
                    is_unique: row.is_unique,
                    is_primary: row.is_primary,
                },
            );
        }
        let index = table_indexes.get_mut(&row.index_name).expect("just inserted");
        if !index.columns.contains(&row.column_name) {
            index.columns.push(row.column_name);
        }
    }

    index_order
        .into_iter()
        .map(|(key, names)| {
            let mut table_indexes = by_table.remove(&key).unwrap_or_default();
            let ordered = names
                .into_iter()
                .filter_map(|name| table_indexes.remove(&name))
                .collect();
            (key, ordered)
        })
        .collect()
}

fn merge_foreign_keys(rows: Vec<ForeignKeyRow>) -> BTreeMap<TableKey, Vec<ForeignKey>> {
    let mut fk_order: BTreeMap<TableKey, Vec<String>> = BTreeMap::new();
    let mut by_table: BTreeMap<TableKey, BTreeMap<String, ForeignKey>> = BTreeMap::new();

    for row in rows {
        let key = (row.schema_name.clone(), row.table_name.clone());
        let table_fks = by_table.entry(key.clone()).or_default();
        if !table_fks.contains_key(&row.constraint_name) {
            fk_order
                .entry(key.clone())
                .or_default()
                .push(row.constraint_name.clone());
            table_fks.insert(
                row.constraint_name.clone(),
                ForeignKey {
                    name: row.constraint_name.clone(),
                    columns: Vec::new(),
                    referenced_table: row.foreign_table.clone(),
                    referenced_columns: Vec::new(),
                    on_delete: non_empty_or_no_action(row.on_delete),
                    on_update: non_empty_or_no_action(row.on_update),
                },
            );
        }
        let fk = table_fks.get_mut(&row.constraint_name).expect("just inserted");
        if !fk.columns.contains(&row.column_name) {
            fk.columns.push(row.column_name);
        }
        if !fk.referenced_columns.contains(&row.foreign_column) {
            fk.referenced_columns.push(row.foreign_column);
        }
    }

    fk_order
        .into_iter()
        .map(|(key, names)| {
            let mut table_fks = by_table.remove(&key).unwrap_or_default();
            let ordered = names
                .into_iter()
                .filter_map(|name| table_fks.remove(&name))
                .collect();
            (key, ordered)
        })
        .collect()
}

fn non_empty_or_no_action(value: String) -> String {
    if value.trim().is_empty() {
        crate::ir::NO_ACTION.to_string()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_bool_recognizes_common_shapes() {
        assert!(normalize_bool("YES"));
        assert!(normalize_bool("yes"));
        assert!(normalize_bool("1"));
        assert!(normalize_bool("true"));
        assert!(!normalize_bool("NO"));
        assert!(!normalize_bool("0"));
        assert!(!normalize_bool("false"));
        assert!(!normalize_bool(""));
    }

    #[test]
    fn merge_indexes_dedupes_and_preserves_column_order() {
        let rows = vec![
            IndexRow {
                schema_name: "public".into(),
                table_name: "users".into(),
                index_name: "idx_name_email".into(),
                column_name: "name".into(),
                is_unique: true,
                is_primary: false,
            },
            IndexRow {
                schema_name: "public".into(),
                table_name: "users".into(),
                index_name: "idx_name_email".into(),
                column_name: "email".into(),
                is_unique: true,
                is_primary: false,
            },
        ];
        let merged = merge_indexes(rows);
        let indexes = &merged[&("public".to_string(), "users".to_string())];
        assert_eq!(indexes.len(), 1);
        assert_eq!(indexes[0].columns, vec!["name", "email"]);
    }

    #[test]
    fn merge_foreign_keys_defaults_missing_actions_to_no_action() {
        let rows = vec![ForeignKeyRow {
            schema_name: "public".into(),
            table_name: "posts".into(),
            constraint_name: "fk_posts_user_id".into(),
            column_name: "user_id".into(),
            foreign_table: "users".into(),
            foreign_column: "id".into(),
            on_delete: String::new(),
            on_update: String::new(),
        }];
        let merged = merge_foreign_keys(rows);
        let fks = &merged[&("public".to_string(), "posts".to_string())];
        assert_eq!(fks[0].on_delete, "NO ACTION");
        assert_eq!(fks[0].on_update, "NO ACTION");
    }
}
