//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- FOOD ITEMS
        -- One logged food per row, ids minted by the client
        -- ============================================
        CREATE TABLE food_items (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL,                  -- ISO date: "2026-01-09"
            meal TEXT NOT NULL DEFAULT 'unspecified'
                CHECK(meal IN ('breakfast', 'lunch', 'dinner', 'snack', 'unspecified')),
            description TEXT NOT NULL,

            calories REAL NOT NULL DEFAULT 0,
            protein REAL NOT NULL DEFAULT 0,     -- grams
            carbs REAL NOT NULL DEFAULT 0,       -- grams
            fiber REAL NOT NULL DEFAULT 0,       -- grams
            sugar REAL NOT NULL DEFAULT 0,       -- grams
            fat REAL NOT NULL DEFAULT 0,         -- grams
            saturated_fat REAL NOT NULL DEFAULT 0, -- grams
            sodium REAL NOT NULL DEFAULT 0,      -- milligrams
            cholesterol REAL NOT NULL DEFAULT 0, -- milligrams

            logged_at TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_food_items_date ON food_items(date);

        -- ============================================
        -- EXERCISE SETS
        -- Calorie estimate cached as low/high bounds
        -- ============================================
        CREATE TABLE exercise_sets (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL,
            exercise_key TEXT NOT NULL,          -- canonical, e.g. "bench_press"
            subtype TEXT,
            sets INTEGER NOT NULL DEFAULT 0,
            reps INTEGER NOT NULL DEFAULT 0,
            weight REAL NOT NULL DEFAULT 0,      -- user's weight unit
            duration_minutes REAL,
            distance REAL,                       -- user's distance unit
            metadata TEXT,                       -- JSON object

            calories_low REAL,
            calories_high REAL,

            logged_at TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),

            CHECK ((calories_low IS NULL) = (calories_high IS NULL))
        );

        CREATE INDEX idx_exercise_sets_date ON exercise_sets(date);
        CREATE INDEX idx_exercise_sets_key ON exercise_sets(exercise_key);

        -- ============================================
        -- SAVED TEMPLATES
        -- Named meals and routines
        -- ============================================
        CREATE TABLE saved_templates (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT NOT NULL CHECK(kind IN ('meal', 'routine')),
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            items TEXT NOT NULL,                 -- JSON array
            signature TEXT NOT NULL,
            use_count INTEGER NOT NULL DEFAULT 0,
            last_used_at TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_saved_templates_kind ON saved_templates(kind);
        CREATE INDEX idx_saved_templates_signature ON saved_templates(signature);

        -- ============================================
        -- CUSTOM LOGS
        -- User-defined numeric measurements
        -- ============================================
        CREATE TABLE custom_log_types (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            unit TEXT,
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE custom_log_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            log_type_id INTEGER NOT NULL REFERENCES custom_log_types(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            value REAL NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_custom_log_entries_type_date ON custom_log_entries(log_type_id, date);

        -- ============================================
        -- USER SETTINGS
        -- Single row
        -- ============================================
        CREATE TABLE user_settings (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            body_weight REAL,
            weight_unit TEXT NOT NULL DEFAULT 'lbs' CHECK(weight_unit IN ('lbs', 'kg')),
            distance_unit TEXT NOT NULL DEFAULT 'miles' CHECK(distance_unit IN ('miles', 'km')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), 0);

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test]
    fn test_settings_single_row() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute("INSERT INTO user_settings (id) VALUES (1)", []).unwrap();
        assert!(conn.execute("INSERT INTO user_settings (id) VALUES (2)", []).is_err());
    }
}
