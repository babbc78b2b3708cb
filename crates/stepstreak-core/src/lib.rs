//! # stepstreak Core Library
//!
//! This library provides the core logic for tracking a daily activity goal
//! as a streak of consecutive successful days, backed by a bonus-day ledger
//! that forgives a few missed days and refills after sustained success.
//! Like the CLI built on top of it, everything here is synchronous and
//! single-writer.
//!
//! ## Architecture
//!
//! - **Reconciliation Engine**: walks forward from the last reconciled day
//!   to today, judging each day against its sticky goal and spending or
//!   earning bonus days
//! - **Storage**: SQLite-based day records, ledger and activity amounts,
//!   plus TOML-based configuration
//! - **Calendar**: local-calendar day keys and inclusive day ranges
//!
//! ## Key Components
//!
//! - [`reconcile`]: the reconciliation walk over a [`RecordStore`]
//! - [`Reconciler`]: load ledger, fetch activity, reconcile
//! - [`Database`]: SQLite record store and activity source
//! - [`Config`]: application configuration management

pub mod calendar;
pub mod error;
pub mod storage;
pub mod streak;

pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use storage::{Config, Database};
pub use streak::{
    current_streak, reconcile, ActivitySource, DailyAmounts, DayRecord, Ledger, MemoryStore,
    RecordStore, Reconciler, Reconciliation,
};
