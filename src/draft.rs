//! Validation of new transactions before they are handed to the record
//! store.

use chrono::{DateTime, Utc};

use crate::error::{LedgerError, Result};
use crate::models::{TransactionId, TransactionKind, TransactionRecord, is_expense_category};

/// User input for a new transaction, as typed into the entry form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionDraft {
    /// Amount text, e.g. `"12.50"`.
    pub amount: String,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Expense category; ignored for income.
    pub category: Option<String>,
    /// Description text.
    pub description: String,
}

impl TransactionDraft {
    /// Validates the draft and builds the record to store.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidDraft`] if the amount or description
    /// is blank, the amount is not a finite non-negative number, or the
    /// category is not part of the expense vocabulary.
    pub fn validate(
        &self,
        id: TransactionId,
        occurred_at: DateTime<Utc>,
    ) -> Result<TransactionRecord> {
        let amount = parse_amount(&self.amount)?;
        let description = self.description.trim();
        if description.is_empty() {
            return Err(invalid("description", "is required"));
        }
        let category = match self.kind {
            TransactionKind::Income => None,
            TransactionKind::Expense => self.expense_category()?,
        };
        Ok(TransactionRecord {
            id,
            amount,
            kind: self.kind,
            category,
            description: description.to_owned(),
            occurred_at: Some(occurred_at),
        })
    }

    /// Checks the category of an expense draft. Blank means none; the kind
    /// label is accepted for compatibility with legacy entries.
    fn expense_category(&self) -> Result<Option<String>> {
        let Some(label) = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
        else {
            return Ok(None);
        };
        if is_expense_category(label) || label == TransactionKind::Expense.label() {
            Ok(Some(label.to_owned()))
        } else {
            Err(invalid("category", format!("unknown expense category {label:?}")))
        }
    }
}

/// Parses the amount text.
fn parse_amount(text: &str) -> Result<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Err(invalid("amount", "is required"));
    }
    let amount: f64 = text
        .parse()
        .map_err(|err| invalid("amount", format!("{text:?} is not a number ({err})")))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(invalid("amount", "must be a finite, non-negative number"));
    }
    Ok(amount)
}

/// Builds an [`LedgerError::InvalidDraft`].
fn invalid<R: Into<String>>(field: &'static str, reason: R) -> LedgerError {
    LedgerError::InvalidDraft {
        field,
        reason: reason.into(),
    }
}
