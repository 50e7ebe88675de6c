use schemadiff_core::emit::{DDLBackend, qualify, quote};
use schemadiff_core::{Column, ForeignKey, Index, Result, Sequence};
use schemadiff_core::{ColumnChange, SequenceChange};
use schemadiff_testkit::{TestResult, load_test_cases_from_str, run_test_case};

/// A minimal backend used only to exercise the fixture runner itself, not
/// any particular dialect's DDL conventions.
#[derive(Debug, Default, Clone, Copy)]
struct PlainBackend;

impl DDLBackend for PlainBackend {
    fn create_schema(&self, schema_name: &str) -> String {
        format!("CREATE SCHEMA {};\n", quote(schema_name))
    }

    fn drop_schema(&self, schema_name: &str) -> String {
        format!("DROP SCHEMA {};\n", quote(schema_name))
    }

    fn create_table(&self, table: &schemadiff_core::Table) -> String {
        let columns: Vec<String> = table
            .columns
            .iter()
            .map(|c| format!("{} {}", quote(&c.name), c.data_type))
            .collect();
        format!(
            "CREATE TABLE {} ({});\n",
            qualify(&table.schema_name, &table.name),
            columns.join(", ")
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

    fn drop_index(&self, _schema_name: &str, _table_name: &str, index: &Index) -> String {
        format!("DROP INDEX {};\n", quote(&index.name))
    }

    fn add_foreign_key(&self, schema_name: &str, table_name: &str, fk: &ForeignKey) -> String {
        format!(
            "ALTER TABLE {} ADD CONSTRAINT {};\n",
            qualify(schema_name, table_name),
            quote(&fk.name)
        )
    }

    fn drop_foreign_key(&self, schema_name: &str, table_name: &str, fk_name: &str) -> String {
        format!(
            "ALTER TABLE {} DROP CONSTRAINT {};\n",
            qualify(schema_name, table_name),
            quote(fk_name)
        )
    }

    fn add_column(&self, schema_name: &str, table_name: &str, column: &Column) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {};\n",
            qualify(schema_name, table_name),
            quote(&column.name)
        )
    }

    fn drop_column(&self, schema_name: &str, table_name: &str, column_name: &str) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN {};\n",
            qualify(schema_name, table_name),
            quote(column_name)
        )
    }

    fn modify_column(
        &self,
        schema_name: &str,
        table_name: &str,
        change: &ColumnChange,
        _forward: bool,
    ) -> String {
        format!(
            "ALTER TABLE {} ALTER COLUMN {};\n",
            qualify(schema_name, table_name),
            quote(&change.name)
        )
    }

    fn create_sequence(&self, sequence: &Sequence) -> Result<String> {
        Ok(format!(
            "CREATE SEQUENCE {};\n",
            qualify(&sequence.schema_name, &sequence.name)
        ))
    }

    fn alter_sequence(&self, change: &SequenceChange, _forward: bool) -> Result<String> {
        Ok(format!(
            "ALTER SEQUENCE {};\n",
            qualify(&change.schema_name, &change.name)
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

const ADDED_TABLE_FIXTURE: &str = r#"
added_table:
  source:
    schemas:
      - name: public
        tables: []
  target:
    schemas:
      - name: public
        tables:
          - name: posts
            schema_name: public
            columns:
              - name: id
                data_type: INTEGER
                is_primary: true
  expect_summary:
    tables_added: 1
  expect_up_contains:
    - "CREATE TABLE \"public\".\"posts\""
  expect_down_contains:
    - "DROP TABLE \"public\".\"posts\""
"#;

#[test]
fn added_table_fixture_passes() {
    let cases = load_test_cases_from_str(ADDED_TABLE_FIXTURE).expect("fixture parses");
    let case = cases.get("added_table").expect("fixture present");
    assert_eq!(run_test_case(&PlainBackend, case), TestResult::Passed);
}

const MODIFIED_COLUMN_FIXTURE: &str = r#"
widened_column:
  source:
    schemas:
      - name: public
        tables:
          - name: posts
            schema_name: public
            columns:
              - name: id
                data_type: INTEGER
                is_primary: true
              - name: title
                data_type: VARCHAR(50)
  target:
    schemas:
      - name: public
        tables:
          - name: posts
            schema_name: public
            columns:
              - name: id
                data_type: INTEGER
                is_primary: true
              - name: title
                data_type: VARCHAR(255)
  expect_summary:
    tables_modified: 1
  expect_up_contains:
    - "ALTER TABLE \"public\".\"posts\" ALTER COLUMN \"title\""
"#;

#[test]
fn modified_column_fixture_passes() {
    let cases = load_test_cases_from_str(MODIFIED_COLUMN_FIXTURE).expect("fixture parses");
    let case = cases.get("widened_column").expect("fixture present");
    assert_eq!(run_test_case(&PlainBackend, case), TestResult::Passed);
}

#[test]
fn mismatched_summary_expectation_fails() {
    let cases = load_test_cases_from_str(ADDED_TABLE_FIXTURE).expect("fixture parses");
    let mut case = cases.get("added_table").expect("fixture present").clone();
    case.expect_summary.insert("tables_added".to_string(), 2);
    match run_test_case(&PlainBackend, &case) {
        TestResult::Failed(_) => {}
        TestResult::Passed => panic!("expected failure on mismatched summary count"),
    }
}
