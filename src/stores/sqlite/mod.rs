//! Contains the SQLite backed stores and the function that creates their tables.

mod budget;
mod category;
mod expense;

pub use budget::SQLiteBudgetStore;
pub use category::SQLiteCategoryStore;
pub use expense::SQLiteExpenseStore;

use rusqlite::Connection;

use crate::Error;

/// Create the tables for the domain models in the database.
///
/// Foreign key enforcement is switched on for `connection` so that expenses
/// and budgets can only refer to categories that exist. Calling this on a
/// database that already has the tables is a no-op.
///
/// # Errors
/// Returns [Error::SqlError] if any of the statements fail.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch(
        "PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            owner_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL REFERENCES category(id),
            amount TEXT NOT NULL,
            description TEXT NOT NULL,
            date TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expense_owner ON expense(owner_id);

        CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY,
            owner_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL REFERENCES category(id),
            amount TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_budget_owner ON budget(owner_id);",
    )?;

    Ok(())
}
