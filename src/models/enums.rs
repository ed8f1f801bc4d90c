//! Enumeration types for constrained record values.

use serde::{Deserialize, Serialize};

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionKind {
    /// Money coming in.
    Income,
    /// Money going out. New entries default to this kind.
    #[default]
    Expense,
}

impl TransactionKind {
    /// Returns the lowercase label used on the wire and in category
    /// selectors (`"income"` or `"expense"`).
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Parses an exact kind label.
    ///
    /// Returns `None` for anything other than `"income"` or `"expense"`.
    #[inline]
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl core::fmt::Display for TransactionKind {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serde_uses_lowercase_labels() {
        let variants = [
            (TransactionKind::Income, r#""income""#),
            (TransactionKind::Expense, r#""expense""#),
        ];
        for (variant, expected_json) in variants {
            let json = serde_json::to_string(&variant).unwrap();
            assert_eq!(json, expected_json);
            let deserialized: TransactionKind = serde_json::from_str(&json).unwrap();
            assert_eq!(deserialized, variant);
        }
    }

    #[test]
    fn from_label_is_exact() {
        assert_eq!(
            TransactionKind::from_label("income"),
            Some(TransactionKind::Income)
        );
        assert_eq!(
            TransactionKind::from_label("expense"),
            Some(TransactionKind::Expense)
        );
        assert_eq!(TransactionKind::from_label("Income"), None);
        assert_eq!(TransactionKind::from_label("Groceries"), None);
    }

    #[test]
    fn default_kind_is_expense() {
        assert_eq!(TransactionKind::default(), TransactionKind::Expense);
    }

    #[test]
    fn invalid_kind_fails() {
        let result = serde_json::from_str::<TransactionKind>(r#""transfer""#);
        assert!(result.is_err());
    }
}
