//! Expense tracking core: expense records, filters and aggregate statistics.
//!
//! The heart of this library is the [aggregation] module, a set of pure
//! functions that filter a user's expenses and compute totals grouped by
//! category or by month. Everything else in the crate feeds records into it
//! ([stores], [import]) or renders what it produces ([export]).
//!
//! Records are always scoped to a single owner before they reach the
//! aggregation functions. [ExpenseService] does that scoping: it takes the
//! owner's ID from the caller, fetches that owner's records from an
//! [ExpenseStore] and hands them to the aggregation functions.

#![warn(missing_docs)]

pub mod aggregation;
mod budget;
mod category;
mod database_id;
mod expense;
pub mod export;
mod filter;
pub mod import;
mod service;
pub mod stores;

#[cfg(test)]
mod test_utils;

pub use aggregation::{CategoryStats, MonthlyStats};
pub use budget::{Budget, BudgetBuilder};
pub use category::{Category, CategoryName};
pub use database_id::{BudgetId, CategoryId, ExpenseId, UserId};
pub use expense::{Expense, ExpenseBuilder};
pub use filter::{ExpenseFilter, parse_iso_date};
pub use service::ExpenseService;
pub use stores::{
    BudgetStore, CategoryStore, ExpenseStore, MemoryExpenseStore, SQLiteBudgetStore,
    SQLiteCategoryStore, SQLiteExpenseStore,
};

/// The errors that may occur in the application.
///
/// The aggregation functions never return errors. These errors come from
/// validating records, talking to a store, or reading and writing files.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An expense was created with an amount of zero or less.
    #[error("{0} is not a valid expense amount, amounts must be greater than zero")]
    NonPositiveAmount(rust_decimal::Decimal),

    /// An expense was created with an empty or whitespace-only description.
    #[error("expense description cannot be empty")]
    EmptyDescription,

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// The category ID used to create an expense did not match a valid category.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(crate::CategoryId),

    /// The specified category name already exists in the store.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update an expense that does not exist.
    #[error("tried to update an expense that is not in the store")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist.
    #[error("tried to delete an expense that is not in the store")]
    DeleteMissingExpense,

    /// Tried to update a budget that does not exist.
    #[error("tried to update a budget that is not in the store")]
    UpdateMissingBudget,

    /// Tried to delete a budget that does not exist.
    #[error("tried to delete a budget that is not in the store")]
    DeleteMissingBudget,

    /// Tried to delete a category that expenses or budgets still refer to.
    #[error("the category {0} cannot be deleted while expenses or budgets use it")]
    CategoryInUse(crate::CategoryId),

    /// Every ID a store can hand out has been used.
    #[error("the store has run out of IDs")]
    IdsExhausted,

    /// A user tried to change a record that belongs to someone else.
    #[error("you do not have permission to modify this record")]
    AccessDenied,

    /// The CSV had issues that prevented it from being parsed.
    #[error("Could not parse the CSV file: {0}")]
    InvalidCSV(String),

    /// Writing an export failed.
    #[error("could not write the export: {0}")]
    ExportError(String),

    /// A file could not be read.
    #[error("could not read file: {0}")]
    IoError(String),

    /// An error occurred while serializing a struct as JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
