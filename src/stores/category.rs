//! Defines the category store trait.

use crate::{Category, CategoryId, CategoryName, Error};

/// Handles the creation and retrieval of expense categories.
pub trait CategoryStore {
    /// Create a new category in the store.
    fn create(&self, name: CategoryName) -> Result<Category, Error>;

    /// Retrieve a category from the store.
    fn get(&self, category_id: CategoryId) -> Result<Category, Error>;

    /// Retrieve all categories in the store.
    fn get_all(&self) -> Result<Vec<Category>, Error>;

    /// Rename the category with `category_id`.
    fn update(&self, category_id: CategoryId, name: CategoryName) -> Result<Category, Error>;

    /// Delete the category with `category_id`.
    ///
    /// A category cannot be deleted while an expense or budget refers to it.
    fn delete(&self, category_id: CategoryId) -> Result<(), Error>;
}
