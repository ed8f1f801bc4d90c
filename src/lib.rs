//! Filtering and aggregation engine for a personal income/expense ledger.
//!
//! The crate turns a snapshot of transaction records into the views a
//! finance tracker shows: records scoped to a named period or custom date
//! range, narrowed by kind or category and by description search, plus
//! income/expense totals, per-month chart buckets and a per-category
//! expense breakdown.
//!
//! The engine ([`period`], [`filter`], [`aggregate`]) is pure and keeps no
//! state between calls; callers re-run it on every new snapshot.

pub mod aggregate;
pub mod draft;
pub mod error;
pub mod filter;
pub mod models;
pub mod period;
pub mod snapshot;
