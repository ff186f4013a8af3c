//! Implements a SQLite backed budget store.

use std::{
    str::FromStr,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{Connection, OptionalExtension, Row, types::Type};
use rust_decimal::Decimal;

use crate::{Budget, BudgetBuilder, BudgetId, CategoryName, Error, UserId, stores::BudgetStore};

const SELECT_BUDGET: &str = "SELECT b.id, b.amount, b.category_id, c.name, b.owner_id
    FROM budget b
    INNER JOIN category c ON c.id = b.category_id";

/// Creates and retrieves budgets to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteBudgetStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteBudgetStore {
    /// Create a new budget store with a SQLite database.
    ///
    /// The database must have been set up with [super::initialize].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::DatabaseLockError)
    }

    fn map_row(row: &Row) -> Result<Budget, rusqlite::Error> {
        let raw_amount: String = row.get(1)?;
        let amount = Decimal::from_str(&raw_amount).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(error))
        })?;
        let raw_category_name: String = row.get(3)?;

        Ok(Budget {
            id: row.get(0)?,
            amount,
            category_id: row.get(2)?,
            category_name: CategoryName::new_unchecked(&raw_category_name),
            owner_id: row.get(4)?,
        })
    }

    fn get_owner(connection: &Connection, id: BudgetId) -> Result<Option<UserId>, Error> {
        connection
            .query_row("SELECT owner_id FROM budget WHERE id = ?1", (id,), |row| {
                row.get(0)
            })
            .optional()
            .map_err(|error| error.into())
    }

    fn get_with_connection(connection: &Connection, id: BudgetId) -> Result<Budget, Error> {
        connection
            .prepare(&format!("{SELECT_BUDGET} WHERE b.id = ?1"))?
            .query_row((id,), SQLiteBudgetStore::map_row)
            .map_err(|error| error.into())
    }
}

fn map_write_error(error: rusqlite::Error, builder: &BudgetBuilder) -> Error {
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

impl BudgetStore for SQLiteBudgetStore {
    /// Create a new budget in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NonPositiveAmount] if the amount is zero or negative,
    /// - or [Error::InvalidCategory] if the category ID does not refer to a real category,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&self, builder: BudgetBuilder) -> Result<Budget, Error> {
        builder.validate()?;

        let connection = self.lock()?;
        let id: BudgetId = connection
            .query_row(
                "INSERT INTO budget (owner_id, category_id, amount)
                VALUES (?1, ?2, ?3)
                RETURNING id",
                (
                    builder.owner_id,
                    builder.category.id,
                    builder.amount.to_string(),
                ),
                |row| row.get(0),
            )
            .map_err(|error| map_write_error(error, &builder))?;

        SQLiteBudgetStore::get_with_connection(&connection, id)
    }

    fn get(&self, id: BudgetId) -> Result<Budget, Error> {
        let connection = self.lock()?;

        SQLiteBudgetStore::get_with_connection(&connection, id)
    }

    fn get_by_owner(&self, owner_id: UserId) -> Result<Vec<Budget>, Error> {
        let connection = self.lock()?;
        let mut statement =
            connection.prepare(&format!("{SELECT_BUDGET} WHERE b.owner_id = ?1 ORDER BY b.id"))?;

        statement
            .query_map((owner_id,), SQLiteBudgetStore::map_row)?
            .map(|maybe_budget| maybe_budget.map_err(|error| error.into()))
            .collect()
    }

    fn update(&self, id: BudgetId, builder: BudgetBuilder) -> Result<Budget, Error> {
        builder.validate()?;

        let connection = self.lock()?;

        match SQLiteBudgetStore::get_owner(&connection, id)? {
            None => return Err(Error::UpdateMissingBudget),
            Some(owner_id) if owner_id != builder.owner_id => return Err(Error::AccessDenied),
            Some(_) => {}
        }

        connection
            .execute(
                "UPDATE budget SET category_id = ?2, amount = ?3 WHERE id = ?1",
                (id, builder.category.id, builder.amount.to_string()),
            )
            .map_err(|error| map_write_error(error, &builder))?;

        SQLiteBudgetStore::get_with_connection(&connection, id)
    }

    fn delete(&self, id: BudgetId, owner_id: UserId) -> Result<(), Error> {
        let connection = self.lock()?;

        match SQLiteBudgetStore::get_owner(&connection, id)? {
            None => return Err(Error::DeleteMissingBudget),
            Some(budget_owner) if budget_owner != owner_id => return Err(Error::AccessDenied),
            Some(_) => {}
        }

        connection.execute("DELETE FROM budget WHERE id = ?1", (id,))?;

        Ok(())
    }
}
