//! Database migrations
//!
//! Schema creation for the in-memory store.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

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

/// Migration v1: history, favorites and the lifetime savings counter
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- HISTORY
        -- One row per saved comparison
        -- ============================================
        CREATE TABLE history_entries (
            id TEXT PRIMARY KEY,                 -- uuid v4
            date TEXT NOT NULL,                  -- RFC 3339, UTC
            category TEXT NOT NULL,
            winner_id TEXT NOT NULL
        );

        CREATE INDEX idx_history_entries_date ON history_entries(date);
        CREATE INDEX idx_history_entries_category ON history_entries(category);

        -- Products of a saved comparison, in the order they were entered
        CREATE TABLE history_products (
            entry_id TEXT NOT NULL REFERENCES history_entries(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            id TEXT NOT NULL,
            name TEXT NOT NULL,
            brand TEXT NOT NULL DEFAULT '',
            store TEXT,
            price REAL NOT NULL,
            amount REAL NOT NULL,
            unit TEXT NOT NULL CHECK(unit IN ('kg', 'g', 'l', 'ml', 'piece', 'pack')),
            category TEXT NOT NULL,
            unit_price REAL NOT NULL,
            added_at TEXT NOT NULL,

            PRIMARY KEY (entry_id, position)
        );

        -- ============================================
        -- FAVORITES
        -- Keyed by the product's identity token
        -- ============================================
        CREATE TABLE favorites (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            brand TEXT NOT NULL DEFAULT '',
            store TEXT,
            price REAL NOT NULL,
            amount REAL NOT NULL,
            unit TEXT NOT NULL CHECK(unit IN ('kg', 'g', 'l', 'ml', 'piece', 'pack')),
            category TEXT NOT NULL,
            unit_price REAL NOT NULL,
            added_at TEXT NOT NULL,
            favorited_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_favorites_category ON favorites(category);

        -- ============================================
        -- PROFILE
        -- Single row holding the lifetime savings total
        -- ============================================
        CREATE TABLE profile (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            total_saved REAL NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        INSERT INTO profile (id, total_saved) VALUES (1, 0);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
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

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());

        let profiles: i64 = conn
            .query_row("SELECT COUNT(*) FROM profile", [], |row| row.get(0))
            .unwrap();
        assert_eq!(profiles, 1);
    }
}
