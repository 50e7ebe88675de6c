use serde::Deserialize;

use schemadiff_core::{Column, ForeignKey, Index, Schema, SchemaSet, Sequence, Table};

/// Serde-friendly mirror of [`SchemaSet`], used to author fixtures as literal
/// YAML instead of SQL text (there is no parser layer to exercise offline).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureSchemaSet {
    pub schemas: Vec<FixtureSchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureSchema {
    pub name: String,
    pub tables: Vec<FixtureTable>,
    pub sequences: Vec<FixtureSequence>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureTable {
    pub name: String,
    #[serde(default)]
    pub schema_name: String,
    pub columns: Vec<FixtureColumn>,
    #[serde(default)]
    pub indexes: Vec<FixtureIndex>,
    #[serde(default)]
    pub foreign_keys: Vec<FixtureForeignKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureColumn {
    pub name: String,
    pub data_type: String,
    #[serde(default)]
    pub is_nullable: bool,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub default: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureIndex {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureForeignKey {
    pub name: String,
    pub columns: Vec<String>,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
    #[serde(default)]
    pub on_delete: String,
    #[serde(default)]
    pub on_update: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureSequence {
    pub name: String,
    #[serde(default)]
    pub schema_name: String,
    #[serde(default)]
    pub start_value: i64,
    #[serde(default)]
    pub min_value: i64,
    #[serde(default)]
    pub max_value: i64,
    #[serde(default = "default_increment")]
    pub increment: i64,
    #[serde(default)]
    pub is_cyclic: bool,
    #[serde(default)]
    pub owned_by_table: String,
    #[serde(default)]
    pub owned_by_column: String,
}

fn default_increment() -> i64 {
    1
}

impl From<FixtureSchemaSet> for SchemaSet {
    fn from(value: FixtureSchemaSet) -> Self {
        SchemaSet {
            schemas: value.schemas.into_iter().map(Schema::from).collect(),
        }
    }
}

impl From<FixtureSchema> for Schema {
    fn from(value: FixtureSchema) -> Self {
        Schema {
            name: value.name,
            tables: value.tables.into_iter().map(Table::from).collect(),
            sequences: value.sequences.into_iter().map(Sequence::from).collect(),
        }
    }
}

impl From<FixtureTable> for Table {
    fn from(value: FixtureTable) -> Self {
        Table {
            name: value.name,
            schema_name: value.schema_name,
            columns: value.columns.into_iter().map(Column::from).collect(),
            indexes: value.indexes.into_iter().map(Index::from).collect(),
            foreign_keys: value
                .foreign_keys
                .into_iter()
                .map(ForeignKey::from)
                .collect(),
        }
    }
}

impl From<FixtureColumn> for Column {
    fn from(value: FixtureColumn) -> Self {
        Column {
            name: value.name,
            data_type: value.data_type,
            is_nullable: value.is_nullable,
            is_primary: value.is_primary,
            default: value.default,
        }
    }
}

impl From<FixtureIndex> for Index {
    fn from(value: FixtureIndex) -> Self {
        Index {
            name: value.name,
            columns: value.columns,
            is_unique: value.is_unique,
            is_primary: value.is_primary,
        }
    }
}

impl From<FixtureForeignKey> for ForeignKey {
    fn from(value: FixtureForeignKey) -> Self {
        ForeignKey {
            name: value.name,
            columns: value.columns,
            referenced_table: value.referenced_table,
            referenced_columns: value.referenced_columns,
            on_delete: value.on_delete,
            on_update: value.on_update,
        }
    }
}

impl From<FixtureSequence> for Sequence {
    fn from(value: FixtureSequence) -> Self {
        Sequence {
            name: value.name,
            schema_name: value.schema_name,
            start_value: value.start_value,
            min_value: value.min_value,
            max_value: value.max_value,
            increment: value.increment,
            is_cyclic: value.is_cyclic,
            owned_by_table: value.owned_by_table,
            owned_by_column: value.owned_by_column,
        }
    }
}
