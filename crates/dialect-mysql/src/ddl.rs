use schemadiff_core::emit::{DDLBackend, qualify, quote};
use schemadiff_core::Table;
use schemadiff_core::{Column, ForeignKey, Index, Result, Sequence};
use schemadiff_core::{ColumnChange, Error, SequenceChange};

#[derive(Debug, Default, Clone, Copy)]
pub struct MysqlBackend;

fn column_definition(column: &Column) -> String {
    let mut def = format!("{} {}", quote(&column.name), column.data_type);
    if !column.is_nullable {
        def.push_str(" NOT NULL");
    }
    if !column.default.is_empty() {
        def.push_str(&format!(" DEFAULT {}", column.default));
    }
    def
}

fn primary_key_clause(columns: &[Column]) -> Option<String> {
    let pk_columns: Vec<&str> = columns
        .iter()
        .filter(|c| c.is_primary)
        .map(|c| c.name.as_str())
        .collect();
    if pk_columns.is_empty() {
        return None;
    }
    let quoted: Vec<String> = pk_columns.iter().map(|c| quote(c)).collect();
    Some(format!("PRIMARY KEY ({})", quoted.join(", ")))
}

fn sequence_unsupported() -> Error {
    Error::UnsupportedDialect {
        tag: "mysql:sequence".into(),
    }
}

impl DDLBackend for MysqlBackend {
    fn create_schema(&self, schema_name: &str) -> String {
        format!("CREATE DATABASE {};\n", quote(schema_name))
    }

    fn drop_schema(&self, schema_name: &str) -> String {
        format!("DROP DATABASE {};\n", quote(schema_name))
    }

    fn create_table(&self, table: &Table) -> String {
        let mut parts: Vec<String> = table.columns.iter().map(column_definition).collect();
        if let Some(pk) = primary_key_clause(&table.columns) {
            parts.push(pk);
        }
        format!(
            "CREATE TABLE {} ({});\n",
            qualify(&table.schema_name, &table.name),
            parts.join(", ")
        )
    }

    fn drop_table(&self, schema_name: &str, table_name: &str) -> String {
        format!("DROP TABLE {};\n", qualify(schema_name, table_name))
    }

    fn create_index(&self, schema_name: &str, table_name: &str, index: &Index) -> String {
        if index.is_primary {
            return String::new();
        }
        let unique = if index.is_unique { "UNIQUE " } else { "" };
        let columns: Vec<String> = index.columns.iter().map(|c| quote(c)).collect();
        format!(
            "CREATE {unique}INDEX {} ON {} ({});\n",
            quote(&index.name),
            qualify(schema_name, table_name),
            columns.join(", ")
        )
    }

    fn drop_index(&self, schema_name: &str, table_name: &str, index: &Index) -> String {
        let table = qualify(schema_name, table_name);
        if index.is_primary {
            return format!("ALTER TABLE {table} DROP PRIMARY KEY;\n");
        }
        format!("ALTER TABLE {table} DROP INDEX {};\n", quote(&index.name))
    }

    fn add_foreign_key(&self, schema_name: &str, table_name: &str, fk: &ForeignKey) -> String {
        let columns: Vec<String> = fk.columns.iter().map(|c| quote(c)).collect();
        let referenced: Vec<String> = fk.referenced_columns.iter().map(|c| quote(c)).collect();
        format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {} ON UPDATE {};\n",
            qualify(schema_name, table_name),
            quote(&fk.name),
            columns.join(", "),
            quote(&fk.referenced_table),
            referenced.join(", "),
            fk.on_delete,
            fk.on_update,
        )
    }

    fn drop_foreign_key(&self, schema_name: &str, table_name: &str, fk_name: &str) -> String {
        format!(
            "ALTER TABLE {} DROP FOREIGN KEY {};\n",
            qualify(schema_name, table_name),
            quote(fk_name)
        )
    }

    fn add_column(&self, schema_name: &str, table_name: &str, column: &Column) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {};\n",
            qualify(schema_name, table_name),
            column_definition(column)
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
        forward: bool,
    ) -> String {
        let target = if forward { &change.target } else { &change.source };
        format!(
            "ALTER TABLE {} MODIFY COLUMN {};\n",
            qualify(schema_name, table_name),
            column_definition(target)
        )
    }

    fn create_sequence(&self, _sequence: &Sequence) -> Result<String> {
        Err(sequence_unsupported())
    }

    fn alter_sequence(&self, _change: &SequenceChange, _forward: bool) -> Result<String> {
        Err(sequence_unsupported())
    }

    fn drop_sequence(&self, _sequence: &Sequence) -> Result<String> {
        Err(sequence_unsupported())
    }

    fn sequence_ownership(&self, _sequence: &Sequence) -> Result<Option<String>> {
        Err(sequence_unsupported())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_table_uses_primary_key_clause() {
        let backend = MysqlBackend;
        let table = Table {
            name: "posts".into(),
            schema_name: "blog".into(),
            columns: vec![Column {
                name: "id".into(),
                data_type: "BIGINT".into(),
                is_nullable: false,
                is_primary: true,
                default: String::new(),
            }],
            indexes: vec![],
            foreign_keys: vec![],
        };
        let sql = backend.create_table(&table);
        assert!(sql.contains("CREATE TABLE \"blog\".\"posts\""));
        assert!(sql.contains("PRIMARY KEY (\"id\")"));
    }

    #[test]
    fn sequence_operations_are_rejected() {
        let backend = MysqlBackend;
        let sequence = Sequence {
            name: "seq".into(),
            schema_name: "blog".into(),
            ..Default::default()
        };
        assert!(backend.create_sequence(&sequence).is_err());
        assert!(backend.drop_sequence(&sequence).is_err());
    }

    #[test]
    fn drop_index_drops_primary_key_without_naming_it() {
        let backend = MysqlBackend;
        let index = Index {
            name: "PRIMARY".into(),
            columns: vec!["id".into()],
            is_unique: true,
            is_primary: true,
        };
        let sql = backend.drop_index("blog", "posts", &index);
        assert_eq!(sql, "ALTER TABLE \"blog\".\"posts\" DROP PRIMARY KEY;\n");
    }
}
