//! SQL schema for the Cookbook SQLite store.
//!
//! Executed once at connection startup. The version is stamped into
//! `PRAGMA user_version`; future migrations will be gated on that number.

/// Value written to `PRAGMA user_version` by [`SCHEMA`].
pub const SCHEMA_VERSION: i64 = 1;

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Foreign keys are declared for documentation but not enforced: notes may
/// reference a recipe id that does not exist, and recipes a domain id that
/// does not exist.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = OFF;

CREATE TABLE IF NOT EXISTS domains (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    description TEXT NOT NULL
);

-- Written only together with their domain.
CREATE TABLE IF NOT EXISTS domain_systems (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    domain_id   INTEGER NOT NULL REFERENCES domains(id),
    system_name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS recipes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    domain_id   INTEGER NOT NULL REFERENCES domains(id),
    title       TEXT NOT NULL,
    sql_content TEXT NOT NULL,   -- opaque; never parsed or executed
    summary     TEXT NOT NULL,
    created_at  TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

-- Notes are append-only.
CREATE TABLE IF NOT EXISTS recipe_notes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    recipe_id   INTEGER NOT NULL REFERENCES recipes(id),
    author_name TEXT NOT NULL,
    note_type   TEXT NOT NULL,   -- 'caution' | 'memo' by convention
    content     TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS domains_name_idx        ON domains(name);
CREATE INDEX IF NOT EXISTS domain_systems_owner_idx ON domain_systems(domain_id);
CREATE INDEX IF NOT EXISTS recipes_domain_idx      ON recipes(domain_id);
CREATE INDEX IF NOT EXISTS recipe_notes_recipe_idx ON recipe_notes(recipe_id);

PRAGMA user_version = 1;
";
