//! DDL generation: `emit(dialect_tag, diff) -> MigrationScript`.
//!
//! Dispatches to a [`DDLBackend`] (see [`crate::DDLBackend`] trait docs) for
//! the dialect-specific statement text, and owns the mandatory emission
//! ordering that keeps the scripts referentially safe.

use crate::diff::types::{ColumnChange, SchemaDiff, SequenceChange, TableDiff};
use crate::error::Result;
use crate::ir::{Column, ForeignKey, Index, Sequence, Table};

/// The terminal output of the pipeline: forward and reverse SQL text.
/// Statements are `;`-terminated and newline-separated; no transactional
/// wrapping or dialect pragmas are inserted — that is the caller's choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationScript {
    pub up: String,
    pub down: String,
}

/// Double-quote an identifier, schema-qualifying it when `schema_name` is
/// non-empty. All three dialects use the same quoting convention here —
/// see the "Identifier quoting" design note for why this is not a
/// per-backend decision.
pub fn qualify(schema_name: &str, name: &str) -> String {
    if schema_name.is_empty() {
        format!("\"{name}\"")
    } else {
        format!("\"{schema_name}\".\"{name}\"")
    }
}

pub fn quote(name: &str) -> String {
    format!("\"{name}\"")
}

/// One pure string-producing operation per DDL verb. Adding a dialect means
/// implementing one more backend; the emitter depends only on this
/// capability set.
///
/// Sequence operations return `Result` because a dialect may have no
/// concept of sequences (MySQL) and must reject them rather than emit
/// nonsense SQL.
pub trait DDLBackend: Send + Sync {
    fn create_schema(&self, schema_name: &str) -> String;
    fn drop_schema(&self, schema_name: &str) -> String;

    /// Columns and primary key only — no foreign keys.
    fn create_table(&self, table: &Table) -> String;
    fn drop_table(&self, schema_name: &str, table_name: &str) -> String;

    fn create_index(&self, schema_name: &str, table_name: &str, index: &Index) -> String;
    fn drop_index(&self, schema_name: &str, table_name: &str, index: &Index) -> String;

    fn add_foreign_key(&self, schema_name: &str, table_name: &str, fk: &ForeignKey) -> String;
    fn drop_foreign_key(&self, schema_name: &str, table_name: &str, fk_name: &str) -> String;

    fn add_column(&self, schema_name: &str, table_name: &str, column: &Column) -> String;
    fn drop_column(&self, schema_name: &str, table_name: &str, column_name: &str) -> String;
    /// `forward = true` applies `change.target`; `forward = false` (the down
    /// script) applies `change.source`.
    fn modify_column(&self, schema_name: &str, table_name: &str, change: &ColumnChange, forward: bool) -> String;

    fn create_sequence(&self, sequence: &Sequence) -> Result<String>;
    /// `forward = true` applies target values; `forward = false` reverts to
    /// source values, restricted to the fields named in `changed_attributes`.
    fn alter_sequence(&self, change: &SequenceChange, forward: bool) -> Result<String>;
    fn drop_sequence(&self, sequence: &Sequence) -> Result<String>;
    /// `None` when the sequence is unowned.
    fn sequence_ownership(&self, sequence: &Sequence) -> Result<Option<String>>;
}

/// Emit the up/down migration script for a diff, following the mandatory
/// ordering from the component design: schemas, then sequence creates, then
/// sequence alters, then table creates, then FKs on new tables, then table
/// alters, then drops in reverse (tables, sequences, schemas). The down
/// script is the exact inverse, built by walking the same diff backward.
pub fn emit(backend: &dyn DDLBackend, diff: &SchemaDiff) -> Result<MigrationScript> {
    let mut up = String::new();
    let mut down = String::new();

    for schema_name in &diff.schemas_added {
        push(&mut up, backend.create_schema(schema_name));
    }

    for sequence in &diff.sequences_added {
        push(&mut up, backend.create_sequence(sequence)?);
        if let Some(stmt) = backend.sequence_ownership(sequence)? {
            push(&mut up, stmt);
        }
    }

    for change in &diff.sequences_modified {
        push(&mut up, backend.alter_sequence(change, true)?);
    }

    for table_diff in &diff.tables_added {
        push(&mut up, backend.create_table(&table_from_diff(table_diff)));
    }

    for table_diff in &diff.tables_added {
        for fk in &table_diff.foreign_keys_added {
            push(
                &mut up,
                backend.add_foreign_key(&table_diff.schema_name, &table_diff.name, fk),
            );
        }
    }

    for table_diff in &diff.tables_modified {
        emit_table_alterations(backend, table_diff, true, &mut up)?;
    }

    for table_diff in &diff.tables_removed {
        for fk in &table_diff.foreign_keys_added {
            push(
                &mut up,
                backend.drop_foreign_key(&table_diff.schema_name, &table_diff.name, &fk.name),
            );
        }
        push(&mut up, backend.drop_table(&table_diff.schema_name, &table_diff.name));
    }

    for sequence in &diff.sequences_removed {
        push(&mut up, backend.drop_sequence(sequence)?);
    }

    for schema_name in &diff.schemas_removed {
        push(&mut up, backend.drop_schema(schema_name));
    }

    // Down script: the exact inverse, in reverse order.
    for schema_name in diff.schemas_removed.iter().rev() {
        push(&mut down, backend.create_schema(schema_name));
    }

    for sequence in diff.sequences_removed.iter().rev() {
        push(&mut down, backend.create_sequence(sequence)?);
        if let Some(stmt) = backend.sequence_ownership(sequence)? {
            push(&mut down, stmt);
        }
    }

    for change in diff.sequences_modified.iter().rev() {
        push(&mut down, backend.alter_sequence(change, false)?);
    }

    for table_diff in diff.tables_removed.iter().rev() {
        push(&mut down, backend.create_table(&table_from_diff(table_diff)));
    }

    for table_diff in diff.tables_removed.iter().rev() {
        for fk in &table_diff.foreign_keys_added {
            push(
                &mut down,
                backend.add_foreign_key(&table_diff.schema_name, &table_diff.name, fk),
            );
        }
    }

    for table_diff in diff.tables_modified.iter().rev() {
        emit_table_alterations(backend, table_diff, false, &mut down)?;
    }

    for table_diff in diff.tables_added.iter().rev() {
        for fk in &table_diff.foreign_keys_added {
            push(
                &mut down,
                backend.drop_foreign_key(&table_diff.schema_name, &table_diff.name, &fk.name),
            );
        }
        push(&mut down, backend.drop_table(&table_diff.schema_name, &table_diff.name));
    }

    for sequence in diff.sequences_added.iter().rev() {
        push(&mut down, backend.drop_sequence(sequence)?);
    }

    for schema_name in diff.schemas_added.iter().rev() {
        push(&mut down, backend.drop_schema(schema_name));
    }

    Ok(MigrationScript { up, down })
}

fn emit_table_alterations(
    backend: &dyn DDLBackend,
    table_diff: &TableDiff,
    forward: bool,
    out: &mut String,
) -> Result<()> {
    let (schema_name, table_name) = (table_diff.schema_name.as_str(), table_diff.name.as_str());

    let (added, removed): (&[Column], &[Column]) = if forward {
        (&table_diff.columns_added, &table_diff.columns_removed)
    } else {
        (&table_diff.columns_removed, &table_diff.columns_added)
    };
    for column in added {
        push(out, backend.add_column(schema_name, table_name, column));
    }
    for change in &table_diff.columns_modified {
        push(out, backend.modify_column(schema_name, table_name, change, forward));
    }
    for column in removed {
        push(out, backend.drop_column(schema_name, table_name, &column.name));
    }

    let (idx_added, idx_removed): (&[Index], &[Index]) = if forward {
        (&table_diff.indexes_added, &table_diff.indexes_removed)
    } else {
        (&table_diff.indexes_removed, &table_diff.indexes_added)
    };
    for index in idx_added {
        push(out, backend.create_index(schema_name, table_name, index));
    }
    for change in &table_diff.indexes_modified {
        let (old, new) = if forward {
            (&change.source, &change.target)
        } else {
            (&change.target, &change.source)
        };
        push(out, backend.drop_index(schema_name, table_name, old));
        push(out, backend.create_index(schema_name, table_name, new));
    }
    for index in idx_removed {
        push(out, backend.drop_index(schema_name, table_name, index));
    }

    let (fk_added, fk_removed): (&[ForeignKey], &[ForeignKey]) = if forward {
        (&table_diff.foreign_keys_added, &table_diff.foreign_keys_removed)
    } else {
        (&table_diff.foreign_keys_removed, &table_diff.foreign_keys_added)
    };
    for fk in fk_added {
        push(out, backend.add_foreign_key(schema_name, table_name, fk));
    }
    for change in &table_diff.foreign_keys_modified {
        let (old, new) = if forward {
            (&change.source, &change.target)
        } else {
            (&change.target, &change.source)
        };
        push(out, backend.drop_foreign_key(schema_name, table_name, &old.name));
        push(out, backend.add_foreign_key(schema_name, table_name, new));
    }
    for fk in fk_removed {
        push(out, backend.drop_foreign_key(schema_name, table_name, &fk.name));
    }

    Ok(())
}

/// `TableDiff` doesn't carry a full `Table` — reconstruct one from its
/// `*_added` lists, which is exactly the shape `create_table` needs for a
/// brand-new table (columns and primary key only, no FKs).
fn table_from_diff(table_diff: &TableDiff) -> Table {
    Table {
        name: table_diff.name.clone(),
        schema_name: table_diff.schema_name.clone(),
        columns: table_diff.columns_added.clone(),
        indexes: table_diff
            .indexes_added
            .iter()
            .filter(|i| i.is_primary)
            .cloned()
            .collect(),
        foreign_keys: Vec::new(),
    }
}

fn push(out: &mut String, statement: String) {
    if statement.is_empty() {
        return;
    }
    out.push_str(&statement);
    if !statement.ends_with('\n') {
        out.push('\n');
    }
}
