use schemadiff_core::emit::{DDLBackend, emit, qualify, quote};
use schemadiff_core::ir::{Column, ForeignKey, Index, Schema, SchemaSet, Sequence, Table};
use schemadiff_core::{ColumnChange, Result, SequenceChange};

/// A backend whose statement text is just enough to assert on ordering and
/// identifier quoting; it does not model any particular dialect's syntax.
#[derive(Debug, Default, Clone, Copy)]
struct RecordingBackend;

impl DDLBackend for RecordingBackend {
    fn create_schema(&self, schema_name: &str) -> String {
        format!("CREATE SCHEMA {};\n", quote(schema_name))
    }

    fn drop_schema(&self, schema_name: &str) -> String {
        format!("DROP SCHEMA {};\n", quote(schema_name))
    }

    fn create_table(&self, table: &Table) -> String {
        format!(
            "CREATE TABLE {};\n",
            qualify(&table.schema_name, &table.name)
        )
    }

    fn drop_table(&self, schema_name: &str, table_name: &str) -> String {
        format!("DROP TABLE {};\n", qualify(schema_name, table_name))
    }

    fn create_index(&self, schema_name: &str, table_name: &str, index: &Index) -> String {
        format!(
            "CREATE INDEX {} ON {};\n",
            quote(&index.name),
            qualify(schema_name, table_name)
        )
    }

    fn drop_index(&self, schema_name: &str, table_name: &str, index: &Index) -> String {
        format!(
            "DROP INDEX {} ON {};\n",
            quote(&index.name),
            qualify(schema_name, table_name)
        )
    }

    fn add_foreign_key(&self, schema_name: &str, table_name: &str, fk: &ForeignKey) -> String {
        format!(
            "ADD FK {} TO {};\n",
            quote(&fk.name),
            qualify(schema_name, table_name)
        )
    }

    fn drop_foreign_key(&self, schema_name: &str, table_name: &str, fk_name: &str) -> String {
        format!(
            "DROP FK {} FROM {};\n",
            quote(fk_name),
            qualify(schema_name, table_name)
        )
    }

    fn add_column(&self, schema_name: &str, table_name: &str, column: &Column) -> String {
        format!(
            "ADD COLUMN {} TO {};\n",
            quote(&column.name),
            qualify(schema_name, table_name)
        )
    }

    fn drop_column(&self, schema_name: &str, table_name: &str, column_name: &str) -> String {
        format!(
            "DROP COLUMN {} FROM {};\n",
            quote(column_name),
            qualify(schema_name, table_name)
        )
    }

    fn modify_column(
        &self,
        schema_name: &str,
        table_name: &str,
        change: &ColumnChange,
        forward: bool,
    ) -> String {
        let target = if forward { &change.target } else { &change.source };
        format!(
            "MODIFY COLUMN {} ON {} TO {};\n",
            quote(&change.name),
            qualify(schema_name, table_name),
            target.data_type
        )
    }

    fn create_sequence(&self, sequence: &Sequence) -> Result<String> {
        Ok(format!(
            "CREATE SEQUENCE {};\n",
            qualify(&sequence.schema_name, &sequence.name)
        ))
    }

    fn alter_sequence(&self, change: &SequenceChange, forward: bool) -> Result<String> {
        let target = if forward { &change.target } else { &change.source };
        Ok(format!(
            "ALTER SEQUENCE {} INCREMENT {};\n",
            qualify(&change.schema_name, &change.name),
            target.increment
        ))
    }

    fn drop_sequence(&self, sequence: &Sequence) -> Result<String> {
        Ok(format!(
            "DROP SEQUENCE {};\n",
            qualify(&sequence.schema_name, &sequence.name)
        ))
    }

    fn sequence_ownership(&self, _sequence: &Sequence) -> Result<Option<String>> {
        Ok(None)
    }
}

fn column(name: &str, data_type: &str, is_primary: bool) -> Column {
    Column {
        name: name.to_string(),
        data_type: data_type.to_string(),
        is_nullable: !is_primary,
        is_primary,
        default: String::new(),
    }
}

#[test]
fn added_unique_index_appears_in_up_and_drop_in_down() {
    let mut before = Table {
        name: "users".into(),
        schema_name: "public".into(),
        columns: vec![column("id", "INTEGER", true), column("email", "TEXT", false)],
        indexes: vec![],
        foreign_keys: vec![],
    };
    let mut after = before.clone();
    after.indexes.push(Index {
        name: "users_email_key".into(),
        columns: vec!["email".into()],
        is_unique: true,
        is_primary: false,
    });
    before.foreign_keys.clear();

    let source = SchemaSet::new(vec![Schema {
        name: "public".into(),
        tables: vec![before],
        sequences: vec![],
    }]);
    let target = SchemaSet::new(vec![Schema {
        name: "public".into(),
        tables: vec![after],
        sequences: vec![],
    }]);

    let schema_diff = schemadiff_core::diff::diff(&source, &target);
    assert_eq!(schema_diff.summary["tables_modified"], 1);

    let script = emit(&RecordingBackend, &schema_diff).expect("emit succeeds");
    assert!(script.up.contains("CREATE INDEX \"users_email_key\""));
    assert!(script.down.contains("DROP INDEX \"users_email_key\""));
}

#[test]
fn sequence_increment_change_is_applied_forward_and_reverted_backward() {
    let source_seq = Sequence {
        name: "orders_id_seq".into(),
        schema_name: "public".into(),
        start_value: 1,
        min_value: 1,
        max_value: i64::MAX,
        increment: 1,
        is_cyclic: false,
        owned_by_table: "orders".into(),
        owned_by_column: "id".into(),
    };
    let mut target_seq = source_seq.clone();
    target_seq.increment = 5;

    let source = SchemaSet::new(vec![Schema {
        name: "public".into(),
        tables: vec![],
        sequences: vec![source_seq],
    }]);
    let target = SchemaSet::new(vec![Schema {
        name: "public".into(),
        tables: vec![],
        sequences: vec![target_seq],
    }]);

    let schema_diff = schemadiff_core::diff::diff(&source, &target);
    assert_eq!(schema_diff.sequences_modified.len(), 1);
    assert_eq!(
        schema_diff.sequences_modified[0].changed_attributes,
        vec!["increment".to_string()]
    );

    let script = emit(&RecordingBackend, &schema_diff).expect("emit succeeds");
    assert!(script.up.contains("INCREMENT 5"));
    assert!(script.down.contains("INCREMENT 1"));
}

#[test]
fn foreign_key_between_two_new_tables_is_added_after_both_tables_exist() {
    let authors = Table {
        name: "authors".into(),
        schema_name: "public".into(),
        columns: vec![column("id", "INTEGER", true)],
        indexes: vec![],
        foreign_keys: vec![],
    };
    let mut books = Table {
        name: "books".into(),
        schema_name: "public".into(),
        columns: vec![column("id", "INTEGER", true), column("author_id", "INTEGER", false)],
        indexes: vec![],
        foreign_keys: vec![],
    };
    books.foreign_keys.push(ForeignKey {
        name: "fk_books_author_id".into(),
        columns: vec!["author_id".into()],
        referenced_table: "authors".into(),
        referenced_columns: vec!["id".into()],
        on_delete: "NO ACTION".into(),
        on_update: "NO ACTION".into(),
    });

    let source = SchemaSet::new(vec![Schema {
        name: "public".into(),
        tables: vec![],
        sequences: vec![],
    }]);
    let target = SchemaSet::new(vec![Schema {
        name: "public".into(),
        tables: vec![authors, books],
        sequences: vec![],
    }]);

    let schema_diff = schemadiff_core::diff::diff(&source, &target);
    assert_eq!(schema_diff.tables_added.len(), 2);

    let script = emit(&RecordingBackend, &schema_diff).expect("emit succeeds");
    let create_authors = script.up.find("CREATE TABLE \"public\".\"authors\"").unwrap();
    let create_books = script.up.find("CREATE TABLE \"public\".\"books\"").unwrap();
    let add_fk = script.up.find("ADD FK \"fk_books_author_id\"").unwrap();
    assert!(create_authors < add_fk);
    assert!(create_books < add_fk);
}
