//! Implements a SQLite backed expense store.

use std::{
    str::FromStr,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{Connection, OptionalExtension, Row, types::Type};
use rust_decimal::Decimal;

use crate::{
    CategoryName, Error, Expense, ExpenseBuilder, ExpenseId, UserId, stores::ExpenseStore,
};

const SELECT_EXPENSE: &str = "SELECT
        e.id,
        e.amount,
        e.description,
        e.date,
        e.category_id,
        c.name,
        e.owner_id
    FROM expense e
    INNER JOIN category c ON c.id = e.category_id";

/// Creates and retrieves expenses to/from a SQLite database.
///
/// Amounts are stored as text so they are read back exactly as written.
/// Category names are joined in at query time, so renaming a category is
/// reflected in every expense that uses it.
#[derive(Debug, Clone)]
pub struct SQLiteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteExpenseStore {
    /// Create a new expense store with a SQLite database.
    ///
    /// The database must have been set up with [super::initialize].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::DatabaseLockError)
    }

    fn map_row(row: &Row) -> Result<Expense, rusqlite::Error> {
        let raw_amount: String = row.get(1)?;
        let amount = Decimal::from_str(&raw_amount).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(error))
        })?;
        let raw_category_name: String = row.get(5)?;

        Ok(Expense {
            id: row.get(0)?,
            amount,
            description: row.get(2)?,
            date: row.get(3)?,
            category_id: row.get(4)?,
            category_name: CategoryName::new_unchecked(&raw_category_name),
            owner_id: row.get(6)?,
        })
    }

    fn get_owner(connection: &Connection, id: ExpenseId) -> Result<Option<UserId>, Error> {
        connection
            .query_row("SELECT owner_id FROM expense WHERE id = ?1", (id,), |row| {
                row.get(0)
            })
            .optional()
            .map_err(|error| error.into())
    }

    fn get_with_connection(connection: &Connection, id: ExpenseId) -> Result<Expense, Error> {
        connection
            .prepare(&format!("{SELECT_EXPENSE} WHERE e.id = ?1"))?
            .query_row((id,), SQLiteExpenseStore::map_row)
            .map_err(|error| error.into())
    }
}

fn map_write_error(error: rusqlite::Error, builder: &ExpenseBuilder) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => Error::InvalidCategory(builder.category.id),
        error => error.into(),
    }
}

impl ExpenseStore for SQLiteExpenseStore {
    /// Create a new expense in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NonPositiveAmount] or [Error::EmptyDescription] if the builder is invalid,
    /// - or [Error::InvalidCategory] if the category ID does not refer to a real category,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&self, builder: ExpenseBuilder) -> Result<Expense, Error> {
        builder.validate()?;

        let connection = self.lock()?;
        let id: ExpenseId = connection
            .query_row(
                "INSERT INTO expense (owner_id, category_id, amount, description, date)
                VALUES (?1, ?2, ?3, ?4, ?5)
                RETURNING id",
                (
                    builder.owner_id,
                    builder.category.id,
                    builder.amount.to_string(),
                    &builder.description,
                    builder.date,
                ),
                |row| row.get(0),
            )
            .map_err(|error| map_write_error(error, &builder))?;

        SQLiteExpenseStore::get_with_connection(&connection, id)
    }

    fn get(&self, id: ExpenseId) -> Result<Expense, Error> {
        let connection = self.lock()?;

        SQLiteExpenseStore::get_with_connection(&connection, id)
    }

    fn get_by_owner(&self, owner_id: UserId) -> Result<Vec<Expense>, Error> {
        let connection = self.lock()?;
        let mut statement =
            connection.prepare(&format!("{SELECT_EXPENSE} WHERE e.owner_id = ?1 ORDER BY e.id"))?;

        statement
            .query_map((owner_id,), SQLiteExpenseStore::map_row)?
            .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
            .collect()
    }

    fn update(&self, id: ExpenseId, builder: ExpenseBuilder) -> Result<Expense, Error> {
        builder.validate()?;

        let connection = self.lock()?;

        match SQLiteExpenseStore::get_owner(&connection, id)? {
            None => return Err(Error::UpdateMissingExpense),
            Some(owner_id) if owner_id != builder.owner_id => return Err(Error::AccessDenied),
            Some(_) => {}
        }

        connection
            .execute(
                "UPDATE expense
                SET category_id = ?2, amount = ?3, description = ?4, date = ?5
                WHERE id = ?1",
                (
                    id,
                    builder.category.id,
                    builder.amount.to_string(),
                    &builder.description,
                    builder.date,
                ),
            )
            .map_err(|error| map_write_error(error, &builder))?;

        SQLiteExpenseStore::get_with_connection(&connection, id)
    }

    fn delete(&self, id: ExpenseId, owner_id: UserId) -> Result<(), Error> {
        let connection = self.lock()?;

        match SQLiteExpenseStore::get_owner(&connection, id)? {
            None => return Err(Error::DeleteMissingExpense),
            Some(expense_owner) if expense_owner != owner_id => return Err(Error::AccessDenied),
            Some(_) => {}
        }

        connection.execute("DELETE FROM expense WHERE id = ?1", (id,))?;

        Ok(())
    }
}
