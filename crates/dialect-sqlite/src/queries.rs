//! Catalog query text for the sqlite dialect, built on `pragma_*` virtual
//! tables rather than `information_schema` (sqlite has neither).
//!
//! SQLite has exactly one schema per connection (`main`, ignoring attached
//! databases, which this dialect does not support), so `SCHEMA` is synthetic
//! and always yields the single row `"main"`.
//!
//! SQLite has no real sequences (`AUTOINCREMENT` is a per-column rowid
//! behavior, not an independent object to diff): the sequence/sequence_ownership
//! queries are intentionally absent — `SqliteHandle` returns empty results
//! for both without issuing a query, matching `DDLBackend`'s rejection of
//! sequence DDL for this dialect.

pub const SCHEMA: &str = "SELECT 'main' AS schema_name";

pub const TABLE: &str = "
    SELECT name, 'main' AS schema_name
    FROM sqlite_master
    WHERE type = 'table'
    AND name NOT LIKE 'sqlite_%'
    ORDER BY name
";

pub const COLUMN: &str = "
    SELECT
        m.name AS table_name,
        p.name AS column_name,
        p.type AS data_type,
        p.\"notnull\" = 0 AS is_nullable,
        p.pk > 0 AS is_primary,
        COALESCE(p.dflt_value, '') AS default_value
    FROM sqlite_master m
    JOIN pragma_table_info(m.name) p
    WHERE m.type = 'table'
    AND m.name NOT LIKE 'sqlite_%'
    ORDER BY m.name, p.cid
";

pub const INDEX: &str = "
    SELECT
        m.name AS table_name,
        il.name AS index_name,
        ii.name AS column_name,
        il.\"unique\" AS is_unique,
        il.origin = 'pk' AS is_primary
    FROM sqlite_master m
    JOIN pragma_index_list(m.name) il
    JOIN pragma_index_info(il.name) ii
    WHERE m.type = 'table'
    AND m.name NOT LIKE 'sqlite_%'
    ORDER BY m.name, il.name, ii.seqno
";

pub const FOREIGN_KEY: &str = "
    SELECT
        m.name AS table_name,
        'fk_' || m.name || '_' || fk.\"id\" AS constraint_name,
        fk.\"from\" AS column_name,
        fk.\"table\" AS foreign_table,
        fk.\"to\" AS foreign_column,
        fk.on_delete,
        fk.on_update
    FROM sqlite_master m
    JOIN pragma_foreign_key_list(m.name) fk
    WHERE m.type = 'table'
    AND m.name NOT LIKE 'sqlite_%'
    ORDER BY m.name, fk.\"id\", fk.seq
";
