use std::collections::BTreeMap;

use super::types::{
    ColumnChange, ForeignKeyChange, IndexChange, SchemaDiff, SequenceChange, TableDiff,
};
use crate::ir::{Column, ForeignKey, Index, Schema, SchemaSet, Sequence, Table};

type TableKey = (String, String);

/// Compare two full schema snapshots and produce a flat, categorized delta.
///
/// Pure and total: no I/O, no error path. Entities are matched by name at
/// every level — schema name, `(schema, table)` for tables, `name` within
/// the parent container for columns/indexes/FKs/sequences. Renames are not
/// detected; a rename is one remove plus one add.
pub fn diff(source: &SchemaSet, target: &SchemaSet) -> SchemaDiff {
    let source_schemas = index_by(&source.schemas, |s| s.name.clone());
    let target_schemas = index_by(&target.schemas, |s| s.name.clone());

    let mut schemas_added: Vec<String> = target_schemas
        .keys()
        .filter(|name| !source_schemas.contains_key(*name))
        .cloned()
        .collect();
    let mut schemas_removed: Vec<String> = source_schemas
        .keys()
        .filter(|name| !target_schemas.contains_key(*name))
        .cloned()
        .collect();
    let mut schemas_same: Vec<String> = source_schemas
        .keys()
        .filter(|name| target_schemas.contains_key(*name))
        .cloned()
        .collect();
    schemas_added.sort();
    schemas_removed.sort();
    schemas_same.sort();

    let source_tables = table_index(&source.schemas);
    let target_tables = table_index(&target.schemas);

    let mut tables_added: Vec<TableDiff> = target_tables
        .iter()
        .filter(|(key, _)| !source_tables.contains_key(*key))
        .map(|(_, table)| table_all_added(table))
        .collect();
    let mut tables_removed: Vec<TableDiff> = source_tables
        .iter()
        .filter(|(key, _)| !target_tables.contains_key(*key))
        .map(|(_, table)| table_all_added(table))
        .collect();

    let mut tables_modified = Vec::new();
    let mut tables_same = Vec::new();
    for (key, source_table) in &source_tables {
        if let Some(target_table) = target_tables.get(key) {
            let table_diff = compare_tables(source_table, target_table);
            if table_diff.is_unchanged() {
                tables_same.push(key.1.clone());
            } else {
                tables_modified.push(table_diff);
            }
        }
    }

    sort_by_key(&mut tables_added, |t| (t.schema_name.clone(), t.name.clone()));
    sort_by_key(&mut tables_removed, |t| (t.schema_name.clone(), t.name.clone()));
    sort_by_key(&mut tables_modified, |t| (t.schema_name.clone(), t.name.clone()));
    tables_same.sort();

    let source_sequences = sequence_index(&source.schemas);
    let target_sequences = sequence_index(&target.schemas);

    let mut sequences_added: Vec<Sequence> = target_sequences
        .iter()
        .filter(|(key, _)| !source_sequences.contains_key(*key))
        .map(|(_, seq)| seq.clone())
        .collect();
    let mut sequences_removed: Vec<Sequence> = source_sequences
        .iter()
        .filter(|(key, _)| !target_sequences.contains_key(*key))
        .map(|(_, seq)| seq.clone())
        .collect();

    let mut sequences_modified = Vec::new();
    let mut sequences_same = Vec::new();
    for (key, source_seq) in &source_sequences {
        if let Some(target_seq) = target_sequences.get(key) {
            let changed = compare_sequences(source_seq, target_seq);
            if changed.changed_attributes.is_empty() {
                sequences_same.push(key.1.clone());
            } else {
                sequences_modified.push(changed);
            }
        }
    }

    sort_by_key(&mut sequences_added, |s| (s.schema_name.clone(), s.name.clone()));
    sort_by_key(&mut sequences_removed, |s| (s.schema_name.clone(), s.name.clone()));
    sort_by_key(&mut sequences_modified, |s| {
        (s.schema_name.clone(), s.name.clone())
    });
    sequences_same.sort();

    let mut summary = BTreeMap::new();
    summary.insert("schemas_added".to_string(), schemas_added.len());
    summary.insert("schemas_removed".to_string(), schemas_removed.len());
    summary.insert("tables_added".to_string(), tables_added.len());
    summary.insert("tables_removed".to_string(), tables_removed.len());
    summary.insert("tables_modified".to_string(), tables_modified.len());
    summary.insert("tables_same".to_string(), tables_same.len());
    summary.insert("sequences_added".to_string(), sequences_added.len());
    summary.insert("sequences_removed".to_string(), sequences_removed.len());
    summary.insert("sequences_modified".to_string(), sequences_modified.len());
    summary.insert("sequences_same".to_string(), sequences_same.len());

    SchemaDiff {
        schemas_added,
        schemas_removed,
        schemas_same,
        tables_added,
        tables_removed,
        tables_modified,
        tables_same,
        sequences_added,
        sequences_removed,
        sequences_modified,
        sequences_same,
        summary,
    }
}

fn index_by<T, K: Ord, F: Fn(&T) -> K>(items: &[T], key_fn: F) -> BTreeMap<K, &T> {
    items.iter().map(|item| (key_fn(item), item)).collect()
}

fn table_index(schemas: &[Schema]) -> BTreeMap<TableKey, &Table> {
    schemas
        .iter()
        .flat_map(|schema| schema.tables.iter())
        .map(|table| ((table.schema_name.clone(), table.name.clone()), table))
        .collect()
}

fn sequence_index(schemas: &[Schema]) -> BTreeMap<TableKey, &Sequence> {
    schemas
        .iter()
        .flat_map(|schema| schema.sequences.iter())
        .map(|seq| ((seq.schema_name.clone(), seq.name.clone()), seq))
        .collect()
}

fn sort_by_key<T, K: Ord, F: Fn(&T) -> K>(items: &mut [T], key_fn: F) {
    items.sort_by(|a, b| key_fn(a).cmp(&key_fn(b)));
}

/// A table present on only one side: every column/index/FK is "added".
fn table_all_added(table: &Table) -> TableDiff {
    TableDiff {
        name: table.name.clone(),
        schema_name: table.schema_name.clone(),
        columns_added: table.columns.clone(),
        indexes_added: table.indexes.clone(),
        foreign_keys_added: table.foreign_keys.clone(),
        ..Default::default()
    }
}

fn compare_tables(source: &Table, target: &Table) -> TableDiff {
    let mut diff = TableDiff {
        name: source.name.clone(),
        schema_name: source.schema_name.clone(),
        ..Default::default()
    };

    let source_columns = index_by(&source.columns, |c| c.name.clone());
    let target_columns = index_by(&target.columns, |c| c.name.clone());

    diff.columns_added = target_columns
        .iter()
        .filter(|(name, _)| !source_columns.contains_key(*name))
        .map(|(_, col)| (*col).clone())
        .collect();
    diff.columns_removed = source_columns
        .iter()
        .filter(|(name, _)| !target_columns.contains_key(*name))
        .map(|(_, col)| (*col).clone())
        .collect();

    for (name, source_col) in &source_columns {
        if let Some(target_col) = target_columns.get(name) {
            match compare_columns(source_col, target_col) {
                Some(change) => diff.columns_modified.push(change),
                None => diff.columns_same.push((*source_col).clone()),
            }
        }
    }

    let source_indexes = index_by(&source.indexes, |i| i.name.clone());
    let target_indexes = index_by(&target.indexes, |i| i.name.clone());

    diff.indexes_added = target_indexes
        .iter()
        .filter(|(name, _)| !source_indexes.contains_key(*name))
        .map(|(_, idx)| (*idx).clone())
        .collect();
    diff.indexes_removed = source_indexes
        .iter()
        .filter(|(name, _)| !target_indexes.contains_key(*name))
        .map(|(_, idx)| (*idx).clone())
        .collect();

    for (name, source_idx) in &source_indexes {
        if let Some(target_idx) = target_indexes.get(name) {
            match compare_indexes(source_idx, target_idx) {
                Some(change) => diff.indexes_modified.push(change),
                None => diff.indexes_same.push((*source_idx).clone()),
            }
        }
    }

    let source_fks = index_by(&source.foreign_keys, |f| f.name.clone());
    let target_fks = index_by(&target.foreign_keys, |f| f.name.clone());

    diff.foreign_keys_added = target_fks
        .iter()
        .filter(|(name, _)| !source_fks.contains_key(*name))
        .map(|(_, fk)| (*fk).clone())
        .collect();
    diff.foreign_keys_removed = source_fks
        .iter()
        .filter(|(name, _)| !target_fks.contains_key(*name))
        .map(|(_, fk)| (*fk).clone())
        .collect();

    for (name, source_fk) in &source_fks {
        if let Some(target_fk) = target_fks.get(name) {
            match compare_foreign_keys(source_fk, target_fk) {
                Some(change) => diff.foreign_keys_modified.push(change),
                None => diff.foreign_keys_same.push((*source_fk).clone()),
            }
        }
    }

    sort_by_key(&mut diff.columns_added, |c| c.name.clone());
    sort_by_key(&mut diff.columns_removed, |c| c.name.clone());
    sort_by_key(&mut diff.columns_modified, |c| c.name.clone());
    sort_by_key(&mut diff.columns_same, |c| c.name.clone());
    sort_by_key(&mut diff.indexes_added, |i| i.name.clone());
    sort_by_key(&mut diff.indexes_removed, |i| i.name.clone());
    sort_by_key(&mut diff.indexes_modified, |i| i.name.clone());
    sort_by_key(&mut diff.indexes_same, |i| i.name.clone());
    sort_by_key(&mut diff.foreign_keys_added, |f| f.name.clone());
    sort_by_key(&mut diff.foreign_keys_removed, |f| f.name.clone());
    sort_by_key(&mut diff.foreign_keys_modified, |f| f.name.clone());
    sort_by_key(&mut diff.foreign_keys_same, |f| f.name.clone());

    diff
}

fn compare_columns(source: &Column, target: &Column) -> Option<ColumnChange> {
    if source == target {
        return None;
    }
    let mut changed = Vec::new();
    if source.data_type != target.data_type {
        changed.push("data_type".to_string());
    }
    if source.is_nullable != target.is_nullable {
        changed.push("is_nullable".to_string());
    }
    if source.is_primary != target.is_primary {
        changed.push("is_primary".to_string());
    }
    if source.default != target.default {
        changed.push("default".to_string());
    }
    Some(ColumnChange {
        name: target.name.clone(),
        source: source.clone(),
        target: target.clone(),
        changed_attributes: changed,
    })
}

fn compare_indexes(source: &Index, target: &Index) -> Option<IndexChange> {
    if source == target {
        return None;
    }
    let mut changed = Vec::new();
    if source.columns != target.columns {
        changed.push("columns".to_string());
    }
    if source.is_unique != target.is_unique {
        changed.push("is_unique".to_string());
    }
    if source.is_primary != target.is_primary {
        changed.push("is_primary".to_string());
    }
    Some(IndexChange {
        name: target.name.clone(),
        source: source.clone(),
        target: target.clone(),
        changed_attributes: changed,
    })
}

fn compare_foreign_keys(source: &ForeignKey, target: &ForeignKey) -> Option<ForeignKeyChange> {
    if source == target {
        return None;
    }
    let mut changed = Vec::new();
    if source.columns != target.columns {
        changed.push("columns".to_string());
    }
    if source.on_delete != target.on_delete {
        changed.push("on_delete".to_string());
    }
    if source.on_update != target.on_update {
        changed.push("on_update".to_string());
    }
    if source.referenced_table != target.referenced_table {
        changed.push("referenced_table".to_string());
    }
    Some(ForeignKeyChange {
        name: target.name.clone(),
        source: source.clone(),
        target: target.clone(),
        changed_attributes: changed,
    })
}

fn compare_sequences(source: &Sequence, target: &Sequence) -> SequenceChange {
    let mut changed = Vec::new();
    if source.increment != target.increment {
        changed.push("increment".to_string());
    }
    if source.is_cyclic != target.is_cyclic {
        changed.push("is_cyclic".to_string());
    }
    if source.max_value != target.max_value {
        changed.push("max_value".to_string());
    }
    if source.min_value != target.min_value {
        changed.push("min_value".to_string());
    }
    if source.start_value != target.start_value {
        changed.push("start_value".to_string());
    }
    if source.owned_by_table != target.owned_by_table
        || source.owned_by_column != target.owned_by_column
    {
        changed.push("owned_by".to_string());
    }
    SequenceChange {
        name: target.name.clone(),
        schema_name: target.schema_name.clone(),
        source: source.clone(),
        target: target.clone(),
        changed_attributes: changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::SchemaSet;

    fn users_table() -> Table {
        Table {
            name: "users".into(),
            schema_name: "public".into(),
            columns: vec![
                Column {
                    name: "id".into(),
                    data_type: "INTEGER".into(),
                    is_nullable: false,
                    is_primary: true,
                    default: String::new(),
                },
                Column {
                    name: "name".into(),
                    data_type: "TEXT".into(),
                    is_nullable: true,
                    is_primary: false,
                    default: String::new(),
                },
            ],
            indexes: vec![],
            foreign_keys: vec![],
        }
    }

    fn schema_set(tables: Vec<Table>) -> SchemaSet {
        SchemaSet::new(vec![Schema {
            name: "public".into(),
            tables,
            sequences: vec![],
        }])
    }

    #[test]
    fn identical_schemas_yield_only_same_entries() {
        let set = schema_set(vec![users_table()]);
        let result = diff(&set, &set);
        assert_eq!(result.tables_same, vec!["users".to_string()]);
        assert!(result.tables_added.is_empty());
        assert!(result.tables_removed.is_empty());
        assert!(result.tables_modified.is_empty());
        assert_eq!(result.summary["tables_same"], 1);
        assert_eq!(result.summary["tables_added"], 0);
    }

    #[test]
    fn added_table_is_reported_fully_populated() {
        let source = schema_set(vec![users_table()]);
        let mut posts = Table {
            name: "posts".into(),
            schema_name: "public".into(),
            columns: vec![Column {
                name: "id".into(),
                data_type: "INTEGER".into(),
                is_nullable: false,
                is_primary: true,
                default: String::new(),
            }],
            indexes: vec![],
            foreign_keys: vec![],
        };
        posts.columns.push(Column {
            name: "title".into(),
            data_type: "TEXT".into(),
            is_nullable: true,
            is_primary: false,
            default: String::new(),
        });
        let target = schema_set(vec![users_table(), posts.clone()]);

        let result = diff(&source, &target);
        assert_eq!(result.tables_added.len(), 1);
        assert_eq!(result.tables_added[0].name, "posts");
        assert_eq!(result.tables_added[0].columns_added.len(), 2);
        assert_eq!(result.tables_same, vec!["users".to_string()]);
    }

    #[test]
    fn column_type_widened_is_reported_as_modified() {
        let source = schema_set(vec![users_table()]);
        let mut target_table = users_table();
        target_table.columns[1].data_type = "VARCHAR(255)".to_string();
        let target = schema_set(vec![target_table]);

        let result = diff(&source, &target);
        assert_eq!(result.tables_modified.len(), 1);
        let change = &result.tables_modified[0].columns_modified[0];
        assert_eq!(change.changed_attributes, vec!["data_type".to_string()]);
        assert_eq!(change.source.data_type, "TEXT");
        assert_eq!(change.target.data_type, "VARCHAR(255)");
    }

    #[test]
    fn table_diff_with_all_children_empty_is_same_not_modified() {
        let table_diff = TableDiff {
            name: "t".into(),
            schema_name: "public".into(),
            ..Default::default()
        };
        assert!(table_diff.is_unchanged());
    }
}
