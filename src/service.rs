//! Answers expense queries for one user at a time.

use rust_decimal::Decimal;
use time::Date;

use crate::{
    CategoryStats, Error, Expense, ExpenseBuilder, ExpenseFilter, MonthlyStats, UserId,
    aggregation, stores::ExpenseStore,
};

/// Fetches a user's expenses from a store and runs the aggregation functions
/// over them.
///
/// The caller is responsible for working out which user is making the
/// request. Every method takes that user's ID and only ever looks at the
/// expenses they own.
#[derive(Debug, Clone)]
pub struct ExpenseService<S> {
    store: S,
}

impl<S: ExpenseStore> ExpenseService<S> {
    /// Create a service backed by `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record a new expense.
    ///
    /// # Errors
    /// Returns any error from [ExpenseStore::create].
    pub fn create_expense(&self, builder: ExpenseBuilder) -> Result<Expense, Error> {
        let expense = self.store.create(builder)?;
        tracing::debug!(
            "Created expense {} for user {}",
            expense.id,
            expense.owner_id
        );

        Ok(expense)
    }

    /// Get the expenses owned by `owner_id` that match `filter`.
    pub fn filter_expenses(
        &self,
        owner_id: UserId,
        filter: &ExpenseFilter,
    ) -> Result<Vec<Expense>, Error> {
        let expenses = self.expenses_for(owner_id)?;

        Ok(aggregation::filter_expenses(&expenses, filter)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Get the total spent by `owner_id` between two optional dates.
    pub fn total_amount(
        &self,
        owner_id: UserId,
        start_date: Option<Date>,
        end_date: Option<Date>,
    ) -> Result<Decimal, Error> {
        let expenses = self.expenses_for(owner_id)?;

        Ok(aggregation::total_amount(&expenses, start_date, end_date))
    }

    /// Get the total of the expenses owned by `owner_id` that match `filter`.
    pub fn filtered_total(&self, owner_id: UserId, filter: &ExpenseFilter) -> Result<Decimal, Error> {
        let expenses = self.expenses_for(owner_id)?;

        Ok(aggregation::filtered_total(&expenses, filter))
    }

    /// Get the total spent by `owner_id` in each category.
    pub fn stats_by_category(&self, owner_id: UserId) -> Result<Vec<CategoryStats>, Error> {
        let expenses = self.expenses_for(owner_id)?;

        Ok(aggregation::stats_by_category(&expenses))
    }

    /// Get the total spent by `owner_id` in each month.
    pub fn stats_by_month(&self, owner_id: UserId) -> Result<Vec<MonthlyStats>, Error> {
        let expenses = self.expenses_for(owner_id)?;

        Ok(aggregation::stats_by_month(&expenses))
    }

    fn expenses_for(&self, owner_id: UserId) -> Result<Vec<Expense>, Error> {
        let expenses = self.store.get_by_owner(owner_id)?;
        tracing::debug!("Fetched {} expenses for user {owner_id}", expenses.len());

        Ok(expenses)
    }
}
