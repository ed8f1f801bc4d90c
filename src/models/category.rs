//! Fixed vocabulary of expense categories.

/// Expense categories offered when recording or filtering transactions.
pub const EXPENSE_CATEGORIES: [&str; 15] = [
    "Auto & Transport",
    "Bills",
    "Business",
    "Donations",
    "Eating Out",
    "Education",
    "Entertainment & Rec",
    "Gifts",
    "Groceries",
    "Health",
    "Home",
    "Medical",
    "Pets",
    "Tech",
    "Travel",
];

/// Returns `true` if `label` is one of [`EXPENSE_CATEGORIES`] (exact match).
#[inline]
#[must_use]
pub fn is_expense_category(label: &str) -> bool {
    EXPENSE_CATEGORIES.contains(&label)
}
