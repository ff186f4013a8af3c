//! ID type definitions.

/// The ID of an expense record.
pub type ExpenseId = i64;

/// The ID of a category.
pub type CategoryId = i64;

/// The ID of the user that owns a set of expenses.
pub type UserId = i64;

/// The ID of a budget.
pub type BudgetId = i64;
