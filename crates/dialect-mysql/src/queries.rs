//! Catalog query text for the mysql dialect, against `information_schema`,
//! scoped to `DATABASE()` (MySQL has no nested-schema concept beyond the
//! database itself, so schema and database are the same thing here).
//!
//! MySQL has no real sequences: the sequence/sequence_ownership queries are
//! intentionally absent — `MysqlHandle` returns empty results for both
//! without issuing a query, matching `DDLBackend`'s rejection of sequence
//! DDL for this dialect.

pub const SCHEMA: &str = "
    SELECT schema_name
    FROM information_schema.schemata
    WHERE schema_name NOT IN ('mysql', 'information_schema', 'performance_schema', 'sys')
    ORDER BY schema_name
";

pub const TABLE: &str = "
    SELECT table_name AS name,
           table_schema AS schema_name
    FROM information_schema.tables
    WHERE table_schema = DATABASE()
    ORDER BY table_name
";

pub const COLUMN: &str = "
    SELECT
        table_schema,
        table_name,
        column_name,
        data_type,
        is_nullable,
        column_key = 'PRI' AS is_primary,
        COALESCE(column_default, '') AS default_value
    FROM information_schema.columns
    WHERE table_schema = DATABASE()
    ORDER BY table_name, ordinal_position
";

pub const INDEX: &str = "
    SELECT
        table_schema,
        table_name,
        index_name,
        column_name,
        non_unique = 0 AS is_unique,
        index_name = 'PRIMARY' AS is_primary
    FROM information_schema.statistics
    WHERE table_schema = DATABASE()
    ORDER BY table_name, index_name, seq_in_index
";

pub const FOREIGN_KEY: &str = "
    SELECT
        table_schema,
        table_name,
        constraint_name,
        column_name,
        referenced_table_name AS foreign_table,
        referenced_column_name AS foreign_column
    FROM information_schema.key_column_usage
    WHERE table_schema = DATABASE()
    AND referenced_table_name IS NOT NULL
    ORDER BY table_name, constraint_name, ordinal_position
";

/// `ON DELETE`/`ON UPDATE` rules live in `referential_constraints`, joined
/// separately since `key_column_usage` doesn't carry them.
pub const FOREIGN_KEY_RULES: &str = "
    SELECT constraint_name, delete_rule, update_rule
    FROM information_schema.referential_constraints
    WHERE constraint_schema = DATABASE()
";
