//! Defines the expense store trait.

use crate::{Error, Expense, ExpenseBuilder, ExpenseId, UserId};

/// Handles the creation and retrieval of expenses.
///
/// Expenses are keyed by their ID. The aggregation functions only ever see
/// the list returned by [ExpenseStore::get_by_owner].
pub trait ExpenseStore {
    /// Create a new expense in the store.
    ///
    /// Implementers should validate `builder` with [ExpenseBuilder::validate]
    /// before storing it.
    fn create(&self, builder: ExpenseBuilder) -> Result<Expense, Error>;

    /// Retrieve an expense from the store.
    ///
    /// Returns [Error::NotFound] if there is no expense with `id`.
    fn get(&self, id: ExpenseId) -> Result<Expense, Error>;

    /// Retrieve every expense recorded by `owner_id`, in the order they were
    /// created.
    fn get_by_owner(&self, owner_id: UserId) -> Result<Vec<Expense>, Error>;

    /// Replace the expense with `id` using the details in `builder`.
    ///
    /// `builder.owner_id` must be the user that owns the expense, otherwise
    /// [Error::AccessDenied] is returned. Returns [Error::UpdateMissingExpense]
    /// if there is no expense with `id`.
    fn update(&self, id: ExpenseId, builder: ExpenseBuilder) -> Result<Expense, Error>;

    /// Delete the expense with `id` on behalf of `owner_id`.
    ///
    /// Returns [Error::AccessDenied] if the expense belongs to another user and
    /// [Error::DeleteMissingExpense] if there is no expense with `id`.
    fn delete(&self, id: ExpenseId, owner_id: UserId) -> Result<(), Error>;
}
