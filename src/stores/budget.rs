//! Defines the budget store trait.

use crate::{Budget, BudgetBuilder, BudgetId, Error, UserId};

/// Handles the creation and retrieval of budgets.
pub trait BudgetStore {
    /// Create a new budget in the store.
    fn create(&self, builder: BudgetBuilder) -> Result<Budget, Error>;

    /// Retrieve a budget from the store.
    ///
    /// Returns [Error::NotFound] if there is no budget with `id`.
    fn get(&self, id: BudgetId) -> Result<Budget, Error>;

    /// Retrieve every budget set by `owner_id`, in the order they were created.
    fn get_by_owner(&self, owner_id: UserId) -> Result<Vec<Budget>, Error>;

    /// Replace the amount and category of the budget with `id`.
    ///
    /// `builder.owner_id` must be the user that owns the budget, otherwise
    /// [Error::AccessDenied] is returned. Returns [Error::UpdateMissingBudget]
    /// if there is no budget with `id`.
    fn update(&self, id: BudgetId, builder: BudgetBuilder) -> Result<Budget, Error>;

    /// Delete the budget with `id` on behalf of `owner_id`.
    ///
    /// Returns [Error::AccessDenied] if the budget belongs to another user and
    /// [Error::DeleteMissingBudget] if there is no budget with `id`.
    fn delete(&self, id: BudgetId, owner_id: UserId) -> Result<(), Error>;
}
