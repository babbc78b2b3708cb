//! Daily goal streaks with a bonus-day ledger.
//!
//! - [`model`]: day records and the ledger singleton
//! - [`store`]: record store / activity source seams and an in-memory store
//! - [`seed`]: streak carried in from closed history
//! - [`engine`]: the forward reconciliation walk

pub mod engine;
pub mod model;
pub mod seed;
pub mod store;

pub use engine::{current_streak, reconcile, seed_date, Reconciler, Reconciliation};
pub use model::{DayRecord, Ledger, DEFAULT_EARN_EVERY_N, DEFAULT_MAX_BALANCE};
pub use seed::{carried_streak, streak_ending_on};
pub use store::{ActivitySource, DailyAmounts, MemoryStore, RecordStore};
