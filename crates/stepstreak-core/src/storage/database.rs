//! SQLite-based streak storage.
//!
//! Provides persistent storage for:
//! - Reconciled day records (one row per calendar day)
//! - The bonus-day ledger (single row)
//! - Raw daily activity amounts, which the CLI uses as its activity source
//!
//! Days are stored as `YYYY-MM-DD` text so rows sort chronologically.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

use super::{data_dir, migrations};
use crate::calendar::{format_day, parse_day};
use crate::error::{DatabaseError, Result};
use crate::streak::{ActivitySource, DailyAmounts, DayRecord, Ledger, RecordStore};

/// SQLite database holding day records, the ledger and activity amounts.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/stepstreak.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("stepstreak.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS day_records (
                day        TEXT PRIMARY KEY,
                goal       INTEGER NOT NULL CHECK (goal > 0),
                actual     INTEGER NOT NULL DEFAULT 0,
                bonus_used INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS ledger (
                id           INTEGER PRIMARY KEY CHECK (id = 1),
                balance      INTEGER NOT NULL,
                max_balance  INTEGER NOT NULL,
                earn_every_n INTEGER NOT NULL,
                watermark    TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS activity (
                day    TEXT PRIMARY KEY,
                amount INTEGER NOT NULL
            );",
        )?;

        migrations::migrate(&self.conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    /// Store the activity total for a day, replacing any earlier value.
    pub fn record_activity(&self, day: NaiveDate, amount: u32) -> Result<()> {
        self.conn.execute(
            "INSERT INTO activity (day, amount) VALUES (?1, ?2)
             ON CONFLICT(day) DO UPDATE SET amount = excluded.amount",
            params![format_day(day), amount],
        )?;
        Ok(())
    }

    /// Activity amounts for `from..=to`.
    pub fn activity_between(&self, from: NaiveDate, to: NaiveDate) -> Result<DailyAmounts> {
        let mut stmt = self.conn.prepare(
            "SELECT day, amount FROM activity
             WHERE day >= ?1 AND day <= ?2
             ORDER BY day",
        )?;
        let rows = stmt.query_map(params![format_day(from), format_day(to)], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?))
        })?;

        let mut amounts = DailyAmounts::new();
        for row in rows {
            let (day, amount) = row?;
            amounts.insert(decode_day("activity", &day)?, amount);
        }
        Ok(amounts)
    }

    /// Day records for `from..=to`, ascending.
    pub fn records_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DayRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT day, goal, actual, bonus_used, bonus_earned FROM day_records
             WHERE day >= ?1 AND day <= ?2
             ORDER BY day",
        )?;
        let rows = stmt.query_map(params![format_day(from), format_day(to)], raw_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(into_record(row?)?);
        }
        Ok(records)
    }
}

type RawRecord = (String, u32, u32, bool, bool);

fn raw_record(row: &rusqlite::Row) -> rusqlite::Result<RawRecord> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn into_record(raw: RawRecord) -> Result<DayRecord> {
    let (day, goal, actual, bonus_used, bonus_earned) = raw;
    Ok(DayRecord {
        day: decode_day("day_records", &day)?,
        goal,
        actual,
        bonus_used,
        bonus_earned,
    })
}

fn decode_day(table: &str, value: &str) -> Result<NaiveDate> {
    parse_day(value).map_err(|e| {
        DatabaseError::CorruptRecord {
            table: table.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

fn write_record(conn: &Connection, record: &DayRecord) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO day_records (day, goal, actual, bonus_used, bonus_earned)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(day) DO UPDATE SET
             goal = excluded.goal,
             actual = excluded.actual,
             bonus_used = excluded.bonus_used,
             bonus_earned = excluded.bonus_earned",
        params![
            format_day(record.day),
            record.goal,
            record.actual,
            record.bonus_used,
            record.bonus_earned,
        ],
    )?;
    Ok(())
}

fn write_ledger(conn: &Connection, ledger: &Ledger) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO ledger (id, balance, max_balance, earn_every_n, watermark)
         VALUES (1, ?1, ?2, ?3, ?4)",
        params![
            ledger.balance,
            ledger.max_balance,
            ledger.earn_every_n,
            format_day(ledger.watermark),
        ],
    )?;
    Ok(())
}

impl RecordStore for Database {
    fn get_record(&self, day: NaiveDate) -> Result<Option<DayRecord>> {
        let raw = self
            .conn
            .query_row(
                "SELECT day, goal, actual, bonus_used, bonus_earned FROM day_records WHERE day = ?1",
                params![format_day(day)],
                raw_record,
            )
            .optional()?;
        raw.map(into_record).transpose()
    }

    fn put_record(&mut self, record: &DayRecord) -> Result<()> {
        write_record(&self.conn, record)?;
        Ok(())
    }

    /// A ledger row that cannot be decoded is treated as absent so the
    /// caller falls back to defaults.
    fn get_ledger(&self) -> Result<Option<Ledger>> {
        let raw = self
            .conn
            .query_row(
                "SELECT balance, max_balance, earn_every_n, watermark FROM ledger WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((balance, max_balance, earn_every_n, watermark)) = raw else {
            return Ok(None);
        };

        let decoded = (|| {
            Some(Ledger {
                balance: u32::try_from(balance).ok()?,
                max_balance: u32::try_from(max_balance).ok()?,
                // Negative intervals mean "never earn".
                earn_every_n: u32::try_from(earn_every_n).unwrap_or(0),
                watermark: parse_day(&watermark).ok()?,
            })
        })();

        if decoded.is_none() {
            warn!(
                balance,
                max_balance,
                earn_every_n,
                %watermark,
                "stored ledger is malformed, falling back to defaults"
            );
        }
        Ok(decoded)
    }

    fn put_ledger(&mut self, ledger: &Ledger) -> Result<()> {
        write_ledger(&self.conn, ledger)?;
        Ok(())
    }

    /// Writes every record and the ledger in one transaction.
    fn commit(&mut self, records: &[DayRecord], ledger: &Ledger) -> Result<()> {
        let tx = self.conn.transaction()?;
        for record in records {
            write_record(&tx, record)?;
        }
        write_ledger(&tx, ledger)?;
        tx.commit()?;
        Ok(())
    }
}

impl ActivitySource for Database {
    fn daily_amounts(&self, from: NaiveDate, to: NaiveDate) -> Result<DailyAmounts> {
        self.activity_between(from, to)
    }
}
