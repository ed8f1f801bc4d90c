//! Data models for ledger entries.
//!
//! This module contains the strongly-typed transaction record consumed by
//! the filter and aggregation engine, its identifier newtype, the
//! income/expense kind, and the fixed expense category vocabulary.

mod category;
mod enums;
mod ids;
mod record;

pub use category::{EXPENSE_CATEGORIES, is_expense_category};
pub use chrono::{DateTime, NaiveDate, Utc};
pub use enums::TransactionKind;
pub use ids::TransactionId;
pub use record::TransactionRecord;
