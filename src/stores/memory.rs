//! Implements an in-memory expense store.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{Error, Expense, ExpenseBuilder, ExpenseId, UserId, stores::ExpenseStore};

/// Keeps expenses in memory, keyed by ID.
///
/// Clones share the same underlying expenses.
#[derive(Debug, Clone, Default)]
pub struct MemoryExpenseStore {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    expenses: BTreeMap<ExpenseId, Expense>,
    last_id: ExpenseId,
}

impl MemoryExpenseStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `expenses`, keeping their IDs.
    ///
    /// New expenses are given IDs after the largest ID in `expenses`. If two
    /// expenses share an ID, the later one replaces the earlier one.
    pub fn from_expenses(expenses: Vec<Expense>) -> Self {
        let last_id = expenses.iter().map(|expense| expense.id).max().unwrap_or(0);
        let expenses = expenses
            .into_iter()
            .map(|expense| (expense.id, expense))
            .collect();

        Self {
            state: Arc::new(Mutex::new(MemoryState { expenses, last_id })),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, Error> {
        self.state.lock().map_err(|_| Error::DatabaseLockError)
    }
}

impl ExpenseStore for MemoryExpenseStore {
    fn create(&self, builder: ExpenseBuilder) -> Result<Expense, Error> {
        builder.validate()?;

        let mut state = self.lock()?;
        let id = state.last_id.checked_add(1).ok_or(Error::IdsExhausted)?;
        let expense = builder.finalize(id)?;

        state.last_id = id;
        state.expenses.insert(id, expense.clone());

        Ok(expense)
    }

    fn get(&self, id: ExpenseId) -> Result<Expense, Error> {
        self.lock()?.expenses.get(&id).cloned().ok_or(Error::NotFound)
    }

    fn get_by_owner(&self, owner_id: UserId) -> Result<Vec<Expense>, Error> {
        Ok(self
            .lock()?
            .expenses
            .values()
            .filter(|expense| expense.owner_id == owner_id)
            .cloned()
            .collect())
    }

    fn update(&self, id: ExpenseId, builder: ExpenseBuilder) -> Result<Expense, Error> {
        builder.validate()?;

        let mut state = self.lock()?;
        let existing = state
            .expenses
            .get(&id)
            .ok_or(Error::UpdateMissingExpense)?;

        if existing.owner_id != builder.owner_id {
            return Err(Error::AccessDenied);
        }

        let expense = builder.finalize(id)?;
        state.expenses.insert(id, expense.clone());

        Ok(expense)
    }

    fn delete(&self, id: ExpenseId, owner_id: UserId) -> Result<(), Error> {
        let mut state = self.lock()?;
        let existing = state
            .expenses
            .get(&id)
            .ok_or(Error::DeleteMissingExpense)?;

        if existing.owner_id != owner_id {
            return Err(Error::AccessDenied);
        }

        state.expenses.remove(&id);

        Ok(())
    }
}
