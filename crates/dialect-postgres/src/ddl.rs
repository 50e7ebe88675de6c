use schemadiff_core::emit::{DDLBackend, qualify, quote};
use schemadiff_core::Table;
use schemadiff_core::{Column, ForeignKey, Index, Result, Sequence};
use schemadiff_core::{ColumnChange, SequenceChange};

#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresBackend;

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

impl DDLBackend for PostgresBackend {
    fn create_schema(&self, schema_name: &str) -> String {
        format!("CREATE SCHEMA {};\n", quote(schema_name))
    }

    fn drop_schema(&self, schema_name: &str) -> String {
        format!("DROP SCHEMA {};\n", quote(schema_name))
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
        if index.is_primary {
            return format!(
                "ALTER TABLE {} DROP CONSTRAINT {};\n",
                qualify(schema_name, table_name),
                quote(&index.name)
            );
        }
        format!("DROP INDEX {};\n", quote(&index.name))
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
            "ALTER TABLE {} DROP CONSTRAINT {};\n",
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
        let table = qualify(schema_name, table_name);
        let column = quote(&target.name);
        let mut out = format!(
            "ALTER TABLE {table} ALTER COLUMN {column} TYPE {};\n",
            target.data_type
        );
        out.push_str(&format!(
            "ALTER TABLE {table} ALTER COLUMN {column} {};\n",
            if target.is_nullable { "DROP NOT NULL" } else { "SET NOT NULL" }
        ));
        if target.default.is_empty() {
            out.push_str(&format!("ALTER TABLE {table} ALTER COLUMN {column} DROP DEFAULT;\n"));
        } else {
            out.push_str(&format!(
                "ALTER TABLE {table} ALTER COLUMN {column} SET DEFAULT {};\n",
                target.default
            ));
        }
        out
    }

    fn create_sequence(&self, sequence: &Sequence) -> Result<String> {
        let cycle = if sequence.is_cyclic { "CYCLE" } else { "NO CYCLE" };
        Ok(format!(
            "CREATE SEQUENCE {} INCREMENT BY {} MINVALUE {} MAXVALUE {} START WITH {} {cycle};\n",
            qualify(&sequence.schema_name, &sequence.name),
            sequence.increment,
            sequence.min_value,
            sequence.max_value,
            sequence.start_value,
        ))
    }

    fn alter_sequence(&self, change: &SequenceChange, forward: bool) -> Result<String> {
        let target = if forward { &change.target } else { &change.source };
        let mut clauses = Vec::new();
        for attr in &change.changed_attributes {
            match attr.as_str() {
                "increment" => clauses.push(format!("INCREMENT BY {}", target.increment)),
                "min_value" => clauses.push(format!("MINVALUE {}", target.min_value)),
                "max_value" => clauses.push(format!("MAXVALUE {}", target.max_value)),
                "is_cyclic" => clauses.push(if target.is_cyclic { "CYCLE".to_string() } else { "NO CYCLE".to_string() }),
                "start_value" => clauses.push(format!("START WITH {}", target.start_value)),
                "owned_by" => clauses.push(if target.owned_by_table.is_empty() {
                    "OWNED BY NONE".to_string()
                } else {
                    format!(
                        "OWNED BY {}.{}",
                        quote(&target.owned_by_table),
                        quote(&target.owned_by_column)
                    )
                }),
                _ => {}
            }
        }
        if clauses.is_empty() {
            return Ok(String::new());
        }
        Ok(format!(
            "ALTER SEQUENCE {} {};\n",
            qualify(&change.schema_name, &change.name),
            clauses.join(" ")
        ))
    }

    fn drop_sequence(&self, sequence: &Sequence) -> Result<String> {
        Ok(format!(
            "DROP SEQUENCE {};\n",
            qualify(&sequence.schema_name, &sequence.name)
        ))
    }

    fn sequence_ownership(&self, sequence: &Sequence) -> Result<Option<String>> {
        if sequence.owned_by_table.is_empty() {
            return Ok(None);
        }
        Ok(Some(format!(
            "ALTER SEQUENCE {} OWNED BY {}.{};\n",
            qualify(&sequence.schema_name, &sequence.name),
            quote(&sequence.owned_by_table),
            quote(&sequence.owned_by_column),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemadiff_core::Table;

    #[test]
    fn create_table_emits_primary_key_clause() {
        let backend = PostgresBackend;
        let table = Table {
            name: "posts".into(),
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
                    name: "title".into(),
                    data_type: "TEXT".into(),
                    is_nullable: true,
                    is_primary: false,
                    default: String::new(),
                },
            ],
            indexes: vec![],
            foreign_keys: vec![],
        };
        let sql = backend.create_table(&table);
        assert!(sql.contains("CREATE TABLE \"public\".\"posts\""));
        assert!(sql.contains("PRIMARY KEY (\"id\")"));
    }

    #[test]
    fn add_foreign_key_defaults_and_syntax() {
        let backend = PostgresBackend;
        let fk = ForeignKey {
            name: "fk_posts_user_id".into(),
            columns: vec!["user_id".into()],
            referenced_table: "users".into(),
            referenced_columns: vec!["id".into()],
            on_delete: "NO ACTION".into(),
            on_update: "NO ACTION".into(),
        };
        let sql = backend.add_foreign_key("public", "posts", &fk);
        assert_eq!(
            sql,
            "ALTER TABLE \"public\".\"posts\" ADD CONSTRAINT \"fk_posts_user_id\" FOREIGN KEY (\"user_id\") REFERENCES \"users\" (\"id\") ON DELETE NO ACTION ON UPDATE NO ACTION;\n"
        );
    }
}
