//! SQL DDL for all lifelog tables.
//!
//! Defines the `section_observations` (append-only), `category_next_steps`
//! and `category_notes` (one row per category), and `schema_meta` tables.
//! All DDL uses `IF NOT EXISTS` for idempotent initialization, and both
//! keyed tables are seeded with an empty row per taxonomy category so that
//! summary reads are total.

use rusqlite::Connection;

use crate::taxonomy;

/// All schema DDL statements for lifelog's core tables.
const SCHEMA_SQL: &str = r#"
-- Append-only observation log. Corrections are new rows; a cleared category
-- keeps its rows with the observation text zeroed.
CREATE TABLE IF NOT EXISTS section_observations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category_id TEXT NOT NULL,
    section_name TEXT NOT NULL,
    observation TEXT NOT NULL DEFAULT '',
    recorded_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_observations_category
    ON section_observations(category_id, recorded_at);

-- One row per category, replaced wholesale on every write.
CREATE TABLE IF NOT EXISTS category_next_steps (
    category_id TEXT PRIMARY KEY,
    next_steps TEXT NOT NULL DEFAULT ''
);

-- One row per category, appended to with a newline separator.
CREATE TABLE IF NOT EXISTS category_notes (
    category_id TEXT PRIMARY KEY,
    notes TEXT NOT NULL DEFAULT ''
);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables and seed per-category rows. Idempotent.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    for category in taxonomy::list_categories() {
        conn.execute(
            "INSERT OR IGNORE INTO category_next_steps (category_id, next_steps) VALUES (?1, '')",
            [category.id],
        )?;
        conn.execute(
            "INSERT OR IGNORE INTO category_notes (category_id, notes) VALUES (?1, '')",
            [category.id],
        )?;
    }

    Ok(())
}
