//! Day records and the bonus-day ledger.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default cap on banked bonus days.
pub const DEFAULT_MAX_BALANCE: u32 = 3;
/// Default number of consecutive credited days that earn one bonus day.
pub const DEFAULT_EARN_EVERY_N: u32 = 7;

/// Outcome of one reconciled calendar day.
///
/// `goal` is fixed the first time the day is reconciled; later goal changes
/// never rewrite it. `actual` tracks the latest amount seen for the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub day: NaiveDate,
    pub goal: u32,
    pub actual: u32,
    /// Credit for this day came from spending a bonus unit.
    pub bonus_used: bool,
    /// Processing this day raised the ledger balance.
    #[serde(default)]
    pub bonus_earned: bool,
}

impl DayRecord {
    /// Empty record for a day that has not been reconciled yet.
    pub fn new(day: NaiveDate, goal: u32) -> Self {
        Self {
            day,
            goal,
            actual: 0,
            bonus_used: false,
            bonus_earned: false,
        }
    }

    /// The goal was met on merit.
    pub fn achieved(&self) -> bool {
        self.actual >= self.goal
    }

    /// The day counts toward a streak, either on merit or via a bonus unit.
    pub fn credited(&self) -> bool {
        self.achieved() || self.bonus_used
    }
}

/// Singleton bonus-day account.
///
/// `watermark` is the last fully reconciled day. It only moves forward,
/// though the watermark day itself may be reconciled again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub balance: u32,
    pub max_balance: u32,
    /// Zero disables automatic earning.
    pub earn_every_n: u32,
    pub watermark: NaiveDate,
}

impl Ledger {
    /// Fresh ledger with default bonus settings, created on `day`.
    pub fn new(day: NaiveDate) -> Self {
        Self {
            balance: 0,
            max_balance: DEFAULT_MAX_BALANCE,
            earn_every_n: DEFAULT_EARN_EVERY_N,
            watermark: day,
        }
    }

    /// Fresh ledger with explicit bonus settings.
    pub fn with_settings(day: NaiveDate, max_balance: u32, earn_every_n: u32) -> Self {
        Self {
            balance: 0,
            max_balance,
            earn_every_n,
            watermark: day,
        }
    }

    /// Clamp a loaded ledger back into its invariants.
    pub fn normalized(mut self) -> Self {
        self.balance = self.balance.min(self.max_balance);
        self
    }

    /// Whether a streak of this length hits an earn milestone.
    pub fn earns_at(&self, streak: u32) -> bool {
        streak > 0 && self.earn_every_n > 0 && streak % self.earn_every_n == 0
    }

    /// Set the balance directly, clamped to `0..=max_balance`.
    pub fn set_balance(&mut self, balance: u32) {
        self.balance = balance.min(self.max_balance);
    }

    /// Change the cap; a balance above the new cap is cut down to it.
    pub fn set_max_balance(&mut self, max_balance: u32) {
        self.max_balance = max_balance;
        self.balance = self.balance.min(max_balance);
    }

    pub fn set_earn_every_n(&mut self, earn_every_n: u32) {
        self.earn_every_n = earn_every_n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()
    }

    #[test]
    fn ledger_defaults() {
        let ledger = Ledger::new(day());
        assert_eq!(ledger.balance, 0);
        assert_eq!(ledger.max_balance, 3);
        assert_eq!(ledger.earn_every_n, 7);
        assert_eq!(ledger.watermark, day());
    }

    #[test]
    fn meeting_goal_exactly_counts() {
        let mut record = DayRecord::new(day(), 10_000);
        record.actual = 10_000;
        assert!(record.achieved());
        assert!(record.credited());
    }

    #[test]
    fn bonus_day_is_credited_without_meeting_goal() {
        let mut record = DayRecord::new(day(), 10_000);
        record.actual = 2_000;
        record.bonus_used = true;
        assert!(!record.achieved());
        assert!(record.credited());
    }

    #[test]
    fn earn_milestones() {
        let ledger = Ledger::new(day());
        assert!(!ledger.earns_at(0));
        assert!(!ledger.earns_at(6));
        assert!(ledger.earns_at(7));
        assert!(ledger.earns_at(14));

        let never = Ledger::with_settings(day(), 3, 0);
        assert!(!never.earns_at(7));
    }

    #[test]
    fn set_balance_clamps_to_cap() {
        let mut ledger = Ledger::new(day());
        ledger.set_balance(10);
        assert_eq!(ledger.balance, 3);
        ledger.set_max_balance(1);
        assert_eq!(ledger.balance, 1);
    }

    #[test]
    fn normalized_repairs_overfull_balance() {
        let ledger = Ledger {
            balance: 9,
            ..Ledger::new(day())
        }
        .normalized();
        assert_eq!(ledger.balance, 3);
    }

    #[test]
    fn record_deserializes_without_bonus_earned() {
        let json = r#"{"day":"2026-04-01","goal":8000,"actual":9000,"bonus_used":false}"#;
        let record: DayRecord = serde_json::from_str(json).unwrap();
        assert!(!record.bonus_earned);
        assert_eq!(record.day, day());
    }
}
