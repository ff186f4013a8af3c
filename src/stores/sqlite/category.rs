//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{Category, CategoryId, CategoryName, Error, stores::CategoryStore};

/// Creates and retrieves expense categories to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store with a SQLite database.
    ///
    /// The database must have been set up with [super::initialize].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
        let id = row.get(0)?;
        let raw_name: String = row.get(1)?;

        Ok(Category {
            id,
            name: CategoryName::new_unchecked(&raw_name),
        })
    }
}

fn map_name_error(error: rusqlite::Error, name: &CategoryName) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => Error::DuplicateCategoryName(name.to_string()),
        error => error.into(),
    }
}

impl CategoryStore for SQLiteCategoryStore {
    /// Create a category in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicateCategoryName] if a category with the same name exists,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&self, name: CategoryName) -> Result<Category, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLockError)?;

        connection
            .execute("INSERT INTO category (name) VALUES (?1);", (name.as_ref(),))
            .map_err(|error| map_name_error(error, &name))?;

        let id = connection.last_insert_rowid();

        Ok(Category { id, name })
    }

    /// Retrieve the category with `category_id`.
    ///
    /// # Errors
    /// This function will return an [Error::NotFound] if there is no such
    /// category, or an [Error::SqlError] if there is some other SQL error.
    fn get(&self, category_id: CategoryId) -> Result<Category, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare("SELECT id, name FROM category WHERE id = :id;")?
            .query_row(&[(":id", &category_id)], SQLiteCategoryStore::map_row)
            .map_err(|error| error.into())
    }

    /// Retrieve all categories in the database, ordered by ID.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_all(&self) -> Result<Vec<Category>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare("SELECT id, name FROM category ORDER BY id;")?
            .query_map([], SQLiteCategoryStore::map_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }

    /// Rename the category with `category_id`.
    ///
    /// Expenses and budgets in the category show the new name the next time
    /// they are read.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if there is no such category,
    /// - or [Error::DuplicateCategoryName] if another category has the name,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&self, category_id: CategoryId, name: CategoryName) -> Result<Category, Error> {
        let rows_affected = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .execute(
                "UPDATE category SET name = ?2 WHERE id = ?1;",
                (category_id, name.as_ref()),
            )
            .map_err(|error| map_name_error(error, &name))?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(Category {
            id: category_id,
            name,
        })
    }

    /// Delete the category with `category_id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if there is no such category,
    /// - or [Error::CategoryInUse] if an expense or budget is in the category,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&self, category_id: CategoryId) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .execute("DELETE FROM category WHERE id = ?1;", (category_id,))
            .map_err(|error| match error {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error {
                        code: _,
                        extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                    },
                    _,
                ) => Error::CategoryInUse(category_id),
                error => error.into(),
            })?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Budget, CategoryName, Error, Expense,
        stores::{
            BudgetStore, CategoryStore, ExpenseStore, SQLiteBudgetStore, SQLiteCategoryStore,
            SQLiteExpenseStore, sqlite::initialize,
        },
    };

    fn get_test_connection() -> Arc<Mutex<Connection>> {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        Arc::new(Mutex::new(connection))
    }

    fn get_test_store() -> SQLiteCategoryStore {
        SQLiteCategoryStore::new(get_test_connection())
    }

    #[test]
    fn create_category_succeeds() {
        let store = get_test_store();
        let name = CategoryName::new("Food").unwrap();

        let category = store.create(name.clone()).unwrap();

        assert!(category.id > 0);
        assert_eq!(category.name, name);
    }

    #[test]
    fn create_duplicate_category_fails() {
        let store = get_test_store();
        store.create(CategoryName::new_unchecked("Food")).unwrap();

        let result = store.create(CategoryName::new_unchecked("Food"));

        assert_eq!(result, Err(Error::DuplicateCategoryName("Food".to_owned())));
    }

    #[test]
    fn get_category_succeeds() {
        let store = get_test_store();
        let inserted_category = store.create(CategoryName::new_unchecked("Books")).unwrap();

        let selected_category = store.get(inserted_category.id);

        assert_eq!(Ok(inserted_category), selected_category);
    }

    #[test]
    fn get_category_with_invalid_id_returns_not_found() {
        let store = get_test_store();
        let inserted_category = store.create(CategoryName::new_unchecked("Books")).unwrap();

        let selected_category = store.get(inserted_category.id + 123);

        assert_eq!(selected_category, Err(Error::NotFound));
    }

    #[test]
    fn get_all_categories() {
        let store = get_test_store();
        let inserted_categories = vec![
            store.create(CategoryName::new_unchecked("Food")).unwrap(),
            store.create(CategoryName::new_unchecked("Books")).unwrap(),
        ];

        let selected_categories = store.get_all().unwrap();

        assert_eq!(inserted_categories, selected_categories);
    }

    #[test]
    fn update_category_renames_it() {
        let store = get_test_store();
        let food = store.create(CategoryName::new_unchecked("Food")).unwrap();

        let renamed = store
            .update(food.id, CategoryName::new_unchecked("Groceries"))
            .unwrap();

        assert_eq!(renamed.id, food.id);
        assert_eq!(renamed.name.as_ref(), "Groceries");
        assert_eq!(store.get(food.id), Ok(renamed));
    }

    #[test]
    fn update_category_shows_in_expenses() {
        let connection = get_test_connection();
        let store = SQLiteCategoryStore::new(connection.clone());
        let expenses = SQLiteExpenseStore::new(connection);
        let food = store.create(CategoryName::new_unchecked("Food")).unwrap();
        let lunch = expenses
            .create(
                Expense::build(1, food.clone(), dec!(50000), date!(2025 - 07 - 05))
                    .description("Lunch"),
            )
            .unwrap();

        store
            .update(food.id, CategoryName::new_unchecked("Groceries"))
            .unwrap();

        assert_eq!(
            expenses.get(lunch.id).unwrap().category_name.as_ref(),
            "Groceries"
        );
    }

    #[test]
    fn update_missing_category_returns_not_found() {
        let store = get_test_store();

        let result = store.update(42, CategoryName::new_unchecked("Food"));

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn update_category_to_existing_name_fails() {
        let store = get_test_store();
        store.create(CategoryName::new_unchecked("Food")).unwrap();
        let books = store.create(CategoryName::new_unchecked("Books")).unwrap();

        let result = store.update(books.id, CategoryName::new_unchecked("Food"));

        assert_eq!(result, Err(Error::DuplicateCategoryName("Food".to_owned())));
        assert_eq!(store.get(books.id), Ok(books));
    }

    #[test]
    fn delete_category_succeeds() {
        let store = get_test_store();
        let food = store.create(CategoryName::new_unchecked("Food")).unwrap();

        store.delete(food.id).unwrap();

        assert_eq!(store.get(food.id), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_category_returns_not_found() {
        let store = get_test_store();

        assert_eq!(store.delete(42), Err(Error::NotFound));
    }

    #[test]
    fn delete_category_with_expenses_fails() {
        let connection = get_test_connection();
        let store = SQLiteCategoryStore::new(connection.clone());
        let expenses = SQLiteExpenseStore::new(connection);
        let food = store.create(CategoryName::new_unchecked("Food")).unwrap();
        expenses
            .create(
                Expense::build(1, food.clone(), dec!(50000), date!(2025 - 07 - 05))
                    .description("Lunch"),
            )
            .unwrap();

        let result = store.delete(food.id);

        assert_eq!(result, Err(Error::CategoryInUse(food.id)));
        assert_eq!(store.get(food.id), Ok(food));
    }

    #[test]
    fn delete_category_with_budgets_fails() {
        let connection = get_test_connection();
        let store = SQLiteCategoryStore::new(connection.clone());
        let budgets = SQLiteBudgetStore::new(connection);
        let food = store.create(CategoryName::new_unchecked("Food")).unwrap();
        budgets
            .create(Budget::build(1, food.clone(), dec!(2000000)))
            .unwrap();

        assert_eq!(store.delete(food.id), Err(Error::CategoryInUse(food.id)));
    }
}
