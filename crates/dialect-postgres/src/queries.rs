//! Catalog query text for the postgres dialect, grounded on `pg_catalog` /
//! `information_schema` joins. `current_schema()` scopes everything to the
//! caller's active search-path schema, mirroring the rest of the core's
//! single-schema-at-a-time introspection contract.

pub const SCHEMA: &str = "
    SELECT schema_name
    FROM information_schema.schemata
    WHERE schema_name NOT LIKE 'pg_%'
    AND schema_name != 'information_schema'
    ORDER BY schema_name
";

pub const TABLE: &str = "
    SELECT table_name AS name,
           table_schema AS schema_name
    FROM information_schema.tables
    WHERE table_schema = current_schema()
    ORDER BY table_name
";

pub const COLUMN: &str = "
    SELECT
        c.table_schema,
        c.table_name,
        c.column_name,
        c.data_type,
        c.is_nullable,
        EXISTS (
            SELECT 1 FROM information_schema.key_column_usage k
            WHERE k.table_name = c.table_name
            AND k.column_name = c.column_name
            AND k.constraint_name IN (
                SELECT constraint_name
                FROM information_schema.table_constraints
                WHERE constraint_type = 'PRIMARY KEY'
            )
        ) AS is_primary,
        COALESCE(c.column_default, '') AS default_value
    FROM information_schema.columns c
    WHERE c.table_schema = current_schema()
    ORDER BY c.table_name, c.ordinal_position
";

pub const INDEX: &str = "
    SELECT
        n.nspname AS schema_name,
        t.relname AS table_name,
        i.relname AS index_name,
        a.attname AS column_name,
        idx.indisunique AS is_unique,
        idx.indisprimary AS is_primary
    FROM pg_class t, pg_class i, pg_index idx, pg_attribute a, pg_namespace n
    WHERE t.oid = idx.indrelid
    AND i.oid = idx.indexrelid
    AND a.attrelid = t.oid
    AND a.attnum = ANY(idx.indkey)
    AND t.relkind = 'r'
    AND t.relnamespace = n.oid
    AND n.nspname = current_schema()
    ORDER BY t.relname, i.relname, array_position(idx.indkey, a.attnum)
";

pub const FOREIGN_KEY: &str = "
    SELECT
        tc.table_schema,
        tc.table_name,
        tc.constraint_name,
        kcu.column_name,
        ccu.table_name AS foreign_table,
        ccu.column_name AS foreign_column,
        rc.delete_rule AS on_delete,
        rc.update_rule AS on_update
    FROM information_schema.table_constraints tc
    JOIN information_schema.key_column_usage kcu
        ON tc.constraint_name = kcu.constraint_name
        AND tc.table_schema = kcu.table_schema
        AND tc.table_name = kcu.table_name
    JOIN information_schema.constraint_column_usage ccu
        ON ccu.constraint_name = tc.constraint_name
        AND ccu.table_schema = tc.table_schema
    JOIN information_schema.referential_constraints rc
        ON rc.constraint_name = tc.constraint_name
        AND rc.constraint_schema = tc.table_schema
    WHERE tc.constraint_type = 'FOREIGN KEY'
    AND tc.table_schema = current_schema()
    ORDER BY tc.table_name, tc.constraint_name, kcu.ordinal_position
";

pub const SEQUENCE: &str = "
    SELECT sequence_name AS name,
           sequence_schema AS schema_name,
           start_value,
           minimum_value,
           maximum_value,
           increment,
           cycle_option AS is_cyclic
    FROM information_schema.sequences
    WHERE sequence_schema = current_schema()
    ORDER BY sequence_name
";

pub const SEQUENCE_OWNERSHIP: &str = "
    SELECT
        seq_ns.nspname AS sequence_schema,
        seq.relname AS sequence_name,
        tab_ns.nspname AS table_schema,
        tab.relname AS table_name,
        attr.attname AS column_name
    FROM pg_depend dep
    JOIN pg_class seq ON seq.oid = dep.objid
    JOIN pg_namespace seq_ns ON seq.relnamespace = seq_ns.oid
    JOIN pg_class tab ON tab.oid = dep.refobjid
    JOIN pg_namespace tab_ns ON tab.relnamespace = tab_ns.oid
    JOIN pg_attribute attr ON attr.attrelid = tab.oid AND attr.attnum = dep.refobjsubid
    WHERE dep.deptype = 'a'
    AND seq.relkind = 'S'
    AND seq_ns.nspname = current_schema()
";
