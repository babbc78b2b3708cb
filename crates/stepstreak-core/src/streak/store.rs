//! Collaborator seams for the reconciliation engine.
//!
//! The engine never talks to a concrete database or sensor API. It reads
//! and writes through [`RecordStore`] and asks an [`ActivitySource`] for
//! per-day amounts. [`crate::storage::Database`] implements both for the
//! CLI; [`MemoryStore`] backs tests and embedders.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::model::{DayRecord, Ledger};
use crate::error::Result;

/// Activity amount per local calendar day. Missing days count as zero.
pub type DailyAmounts = BTreeMap<NaiveDate, u32>;

/// Supplies daily activity totals.
pub trait ActivitySource {
    /// Amounts for every day in `from..=to` that has data.
    fn daily_amounts(&self, from: NaiveDate, to: NaiveDate) -> Result<DailyAmounts>;
}

impl ActivitySource for DailyAmounts {
    fn daily_amounts(&self, from: NaiveDate, to: NaiveDate) -> Result<DailyAmounts> {
        if from > to {
            return Ok(DailyAmounts::new());
        }
        Ok(self
            .range(from..=to)
            .map(|(day, amount)| (*day, *amount))
            .collect())
    }
}

/// Persistence for day records and the ledger singleton.
pub trait RecordStore {
    fn get_record(&self, day: NaiveDate) -> Result<Option<DayRecord>>;

    /// Insert or replace the record keyed by `record.day`.
    fn put_record(&mut self, record: &DayRecord) -> Result<()>;

    /// The stored ledger, or `None` before first use.
    fn get_ledger(&self) -> Result<Option<Ledger>>;

    fn put_ledger(&mut self, ledger: &Ledger) -> Result<()>;

    /// Flush the result of one reconciliation.
    ///
    /// Stores that can do so atomically should override this.
    fn commit(&mut self, records: &[DayRecord], ledger: &Ledger) -> Result<()> {
        for record in records {
            self.put_record(record)?;
        }
        self.put_ledger(ledger)
    }
}

/// In-memory [`RecordStore`] keyed by day.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<NaiveDate, DayRecord>,
    ledger: Option<Ledger>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            records: BTreeMap::new(),
            ledger: Some(ledger),
        }
    }

    /// All records in ascending day order.
    pub fn records(&self) -> impl Iterator<Item = &DayRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn get_record(&self, day: NaiveDate) -> Result<Option<DayRecord>> {
        Ok(self.records.get(&day).cloned())
    }

    fn put_record(&mut self, record: &DayRecord) -> Result<()> {
        self.records.insert(record.day, record.clone());
        Ok(())
    }

    fn get_ledger(&self) -> Result<Option<Ledger>> {
        Ok(self.ledger.clone())
    }

    fn put_ledger(&mut self, ledger: &Ledger) -> Result<()> {
        self.ledger = Some(ledger.clone());
        Ok(())
    }
}
