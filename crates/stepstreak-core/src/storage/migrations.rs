//! Database schema migrations for stepstreak.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};
use tracing::{debug, warn};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: baseline.
///
/// The v1 tables are created by `Database::migrate()` directly; this only
/// records the version.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    set_schema_version(conn, 1)?;
    debug!("schema at v1");
    Ok(())
}

/// Migration v2: track earn milestones per day.
///
/// Adds `bonus_earned` to `day_records` so the watermark day can be
/// reconciled again without earning twice. Existing rows default to 0.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    let has_column: bool = tx
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('day_records') WHERE name = 'bonus_earned'",
            [],
            |row| row.get::<_, i32>(0),
        )
        .unwrap_or(0)
        > 0;

    if !has_column {
        tx.execute_batch(
            "ALTER TABLE day_records ADD COLUMN bonus_earned INTEGER NOT NULL DEFAULT 0;",
        )?;
    }

    tx.execute("DELETE FROM schema_version", [])?;
    tx.execute("INSERT INTO schema_version (version) VALUES (?1)", [2])?;

    tx.commit()?;
    debug!("schema at v2");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v1_schema(conn: &Connection) {
        conn.execute_batch(
            "CREATE TABLE day_records (
                day        TEXT PRIMARY KEY,
                goal       INTEGER NOT NULL,
                actual     INTEGER NOT NULL DEFAULT 0,
                bonus_used INTEGER NOT NULL DEFAULT 0
            );",
        )
        .unwrap();
    }

    #[test]
    fn test_migrate_from_scratch() {
        let conn = Connection::open_in_memory().unwrap();
        v1_schema(&conn);
        conn.execute(
            "INSERT INTO day_records (day, goal, actual, bonus_used)
             VALUES ('2026-01-01', 10000, 4000, 1)",
            [],
        )
        .unwrap();

        migrate(&conn).unwrap();

        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
        let earned: i32 = conn
            .query_row(
                "SELECT bonus_earned FROM day_records WHERE day = '2026-01-01'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(earned, 0);
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        v1_schema(&conn);

        migrate(&conn).unwrap();
        migrate(&conn).unwrap();

        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn test_v2_skips_existing_column() {
        let conn = Connection::open_in_memory().unwrap();
        v1_schema(&conn);
        conn.execute_batch(
            "ALTER TABLE day_records ADD COLUMN bonus_earned INTEGER NOT NULL DEFAULT 0;",
        )
        .unwrap();

        migrate(&conn).unwrap();

        assert_eq!(get_schema_version(&conn), 2);
    }
}
