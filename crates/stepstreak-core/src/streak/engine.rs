//! Streak reconciliation engine.
//!
//! Walks forward from the day after the ledger watermark through `today`,
//! judging each day against its sticky goal, spending or earning bonus days,
//! and writing one [`DayRecord`] per day. The streak entering the window is
//! re-derived from closed history (see [`super::seed`]).
//!
//! Reconciling the same `today` twice with the same inputs is a no-op: a
//! unit the watermark day earned is taken back before it is judged again.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::model::{DayRecord, Ledger, DEFAULT_EARN_EVERY_N, DEFAULT_MAX_BALANCE};
use super::seed::{carried_streak, streak_ending_on};
use super::store::{ActivitySource, DailyAmounts, RecordStore};
use crate::calendar::days;
use crate::error::{Result, ValidationError};

/// Result of one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Streak length after processing `today`.
    pub streak: u32,
    /// Streak carried in from closed history before the window.
    pub carried: u32,
    /// Ledger as persisted.
    pub ledger: Ledger,
    /// Records written, ascending by day.
    pub processed: Vec<DayRecord>,
}

/// First day a reconciliation (re-)processes.
///
/// The day after the watermark, but never later than `today`: today can
/// always be reprocessed while it is in progress.
pub fn seed_date(watermark: NaiveDate, today: NaiveDate) -> NaiveDate {
    watermark.succ_opt().map_or(today, |next| next.min(today))
}

fn check_preconditions(today: NaiveDate, goal_target: u32, ledger: &Ledger) -> Result<()> {
    if goal_target == 0 {
        return Err(ValidationError::GoalNotPositive.into());
    }
    if today < ledger.watermark {
        return Err(ValidationError::ClockMovedBackward {
            watermark: ledger.watermark,
            today,
        }
        .into());
    }
    Ok(())
}

/// Reconcile `ledger` and the stored day records through `today`.
///
/// `activity` must cover the seed date through `today`; days absent from
/// it count as zero. Nothing is written unless every day is processed, and
/// the records and ledger are flushed with a single [`RecordStore::commit`].
///
/// # Errors
/// Returns a validation error when `goal_target` is zero or `today` is
/// earlier than the ledger watermark, and propagates store failures.
pub fn reconcile<S: RecordStore + ?Sized>(
    store: &mut S,
    today: NaiveDate,
    goal_target: u32,
    activity: &DailyAmounts,
    ledger: Ledger,
) -> Result<Reconciliation> {
    check_preconditions(today, goal_target, &ledger)?;

    let mut ledger = ledger.normalized();
    let seed = seed_date(ledger.watermark, today);
    let carried = carried_streak(&*store, seed)?;

    let mut streak = carried;
    let mut balance = ledger.balance;
    let mut processed = Vec::new();

    for day in days(seed, today) {
        let amount = activity.get(&day).copied().unwrap_or(0);
        let existing = store.get_record(day)?;
        let goal = match &existing {
            Some(record) if record.goal > 0 => record.goal,
            _ => goal_target,
        };

        // A re-run watermark day already earned into the balance once.
        // Only today is ever re-run, and today never spends.
        if existing
            .as_ref()
            .is_some_and(|previous| day <= ledger.watermark && previous.bonus_earned)
        {
            balance = balance.saturating_sub(1);
        }

        let mut bonus_used = false;
        if amount >= goal {
            streak += 1;
        } else if day != today && balance > 0 {
            balance -= 1;
            bonus_used = true;
            streak += 1;
        } else {
            streak = 0;
        }

        let mut bonus_earned = false;
        if ledger.earns_at(streak) && balance < ledger.max_balance {
            balance += 1;
            bonus_earned = true;
        }

        debug!(
            %day,
            goal,
            amount,
            streak,
            balance,
            bonus_used,
            bonus_earned,
            "reconciled day"
        );

        processed.push(DayRecord {
            day,
            goal,
            actual: amount,
            bonus_used,
            bonus_earned,
        });
    }

    ledger.balance = balance;
    ledger.watermark = today;
    store.commit(&processed, &ledger)?;

    info!(
        %today,
        %seed,
        carried,
        streak,
        balance = ledger.balance,
        days = processed.len(),
        "streak reconciled"
    );

    Ok(Reconciliation {
        streak,
        carried,
        ledger,
        processed,
    })
}

/// Streak implied by stored history, without reconciling.
///
/// Counts back from `today` when today already has a record, otherwise
/// from yesterday.
pub fn current_streak<S: RecordStore + ?Sized>(store: &S, today: NaiveDate) -> Result<u32> {
    if store.get_record(today)?.is_some() {
        streak_ending_on(store, today)
    } else {
        carried_streak(store, today)
    }
}

/// Reconciliation entry point bound to the user's goal and bonus settings.
///
/// The bonus settings only seed a ledger that does not exist yet; an
/// existing ledger keeps its own cap and earn interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciler {
    goal_target: u32,
    max_balance: u32,
    earn_every_n: u32,
}

impl Reconciler {
    pub fn new(goal_target: u32) -> Self {
        Self {
            goal_target,
            max_balance: DEFAULT_MAX_BALANCE,
            earn_every_n: DEFAULT_EARN_EVERY_N,
        }
    }

    pub fn with_bonus_defaults(mut self, max_balance: u32, earn_every_n: u32) -> Self {
        self.max_balance = max_balance;
        self.earn_every_n = earn_every_n;
        self
    }

    pub fn goal_target(&self) -> u32 {
        self.goal_target
    }

    /// Ledger created on first use.
    pub fn initial_ledger(&self, today: NaiveDate) -> Ledger {
        Ledger::with_settings(today, self.max_balance, self.earn_every_n)
    }

    /// Stored ledger, or a fresh one whose watermark is `today`.
    pub fn load_ledger<S: RecordStore + ?Sized>(&self, store: &S, today: NaiveDate) -> Result<Ledger> {
        Ok(store
            .get_ledger()?
            .map(Ledger::normalized)
            .unwrap_or_else(|| self.initial_ledger(today)))
    }

    /// Load the ledger, fetch activity since the watermark, and reconcile.
    ///
    /// # Errors
    /// Same as [`reconcile`], plus activity source failures.
    pub fn refresh<S, A>(&self, store: &mut S, source: &A, today: NaiveDate) -> Result<Reconciliation>
    where
        S: RecordStore + ?Sized,
        A: ActivitySource + ?Sized,
    {
        let (ledger, activity) = self.pending(&*store, source, today)?;
        reconcile(store, today, self.goal_target, &activity, ledger)
    }

    /// [`Reconciler::refresh`] for a store that also records activity.
    pub fn refresh_stored<S>(&self, store: &mut S, today: NaiveDate) -> Result<Reconciliation>
    where
        S: RecordStore + ActivitySource + ?Sized,
    {
        let (ledger, activity) = self.pending(&*store, &*store, today)?;
        reconcile(store, today, self.goal_target, &activity, ledger)
    }

    /// Ledger and the activity still to be reconciled through `today`.
    fn pending<S, A>(&self, store: &S, source: &A, today: NaiveDate) -> Result<(Ledger, DailyAmounts)>
    where
        S: RecordStore + ?Sized,
        A: ActivitySource + ?Sized,
    {
        let ledger = self.load_ledger(store, today)?;
        check_preconditions(today, self.goal_target, &ledger)?;

        let seed = seed_date(ledger.watermark, today);
        let activity = source.daily_amounts(seed, today)?;
        Ok((ledger, activity))
    }
}
