//! Backward walk over persisted history.
//!
//! Days before the seed date are closed: their records are final, so the
//! streak leading into a reconciliation is re-derived from them on every
//! call instead of trusting a cached counter.

use chrono::NaiveDate;

use super::store::RecordStore;
use crate::error::Result;

/// Length of the credited run of stored records ending on `day` (inclusive).
///
/// Stops at the first day with no record or an uncredited record.
pub fn streak_ending_on<S: RecordStore + ?Sized>(store: &S, day: NaiveDate) -> Result<u32> {
    let mut streak = 0u32;
    let mut current = Some(day);

    while let Some(d) = current {
        match store.get_record(d)? {
            Some(record) if record.credited() => {
                streak += 1;
                current = d.pred_opt();
            }
            _ => break,
        }
    }

    Ok(streak)
}

/// Streak carried into a reconciliation that starts at `seed`.
pub fn carried_streak<S: RecordStore + ?Sized>(store: &S, seed: NaiveDate) -> Result<u32> {
    match seed.pred_opt() {
        Some(previous) => streak_ending_on(store, previous),
        None => Ok(0),
    }
}
