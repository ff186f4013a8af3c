//! Defines the budget record, a spending limit a user sets for one category.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BudgetId, Category, CategoryId, CategoryName, Error, UserId};

/// How much a user plans to spend in a category.
///
/// To create a new `Budget`, use [Budget::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The spending limit, always greater than zero.
    pub amount: Decimal,
    /// The ID of the category the budget applies to.
    pub category_id: CategoryId,
    /// The name of the category the budget applies to.
    pub category_name: CategoryName,
    /// The ID of the user that set the budget.
    pub owner_id: UserId,
}

impl Budget {
    /// Create a new budget.
    ///
    /// Shortcut for [BudgetBuilder] for discoverability.
    pub fn build(owner_id: UserId, category: Category, amount: Decimal) -> BudgetBuilder {
        BudgetBuilder {
            owner_id,
            category,
            amount,
        }
    }

    /// The category of the budget as a [Category].
    pub fn category(&self) -> Category {
        Category {
            id: self.category_id,
            name: self.category_name.clone(),
        }
    }
}

/// A builder for creating [Budget] instances.
#[derive(Debug, PartialEq, Clone)]
pub struct BudgetBuilder {
    /// The user the budget is set for.
    pub owner_id: UserId,

    /// The category the budget applies to.
    pub category: Category,

    /// The spending limit. Must be greater than zero.
    pub amount: Decimal,
}

impl BudgetBuilder {
    /// Check that the builder describes a valid budget.
    ///
    /// # Errors
    /// Returns [Error::NonPositiveAmount] if the amount is zero or negative.
    pub fn validate(&self) -> Result<(), Error> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount(self.amount));
        }

        Ok(())
    }

    /// Create the [Budget] with the given `id`.
    ///
    /// # Errors
    /// Returns the same errors as [BudgetBuilder::validate].
    pub fn finalize(self, id: BudgetId) -> Result<Budget, Error> {
        self.validate()?;

        Ok(Budget {
            id,
            amount: self.amount,
            category_id: self.category.id,
            category_name: self.category.name,
            owner_id: self.owner_id,
        })
    }
}
