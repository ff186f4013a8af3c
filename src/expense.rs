//! Defines the expense record and the builder used to create one.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Category, CategoryId, CategoryName, Error, ExpenseId, UserId};

/// An event where money was spent.
///
/// To create a new `Expense`, use [Expense::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The amount of money spent, always greater than zero.
    pub amount: Decimal,
    /// A text description of what the money was spent on.
    pub description: String,
    /// When the expense happened.
    pub date: Date,
    /// The ID of the category the expense belongs to.
    pub category_id: CategoryId,
    /// The name of the category the expense belongs to.
    pub category_name: CategoryName,
    /// The ID of the user that recorded the expense.
    pub owner_id: UserId,
}

impl Expense {
    /// Create a new expense.
    ///
    /// Shortcut for [ExpenseBuilder] for discoverability.
    pub fn build(
        owner_id: UserId,
        category: Category,
        amount: Decimal,
        date: Date,
    ) -> ExpenseBuilder {
        ExpenseBuilder {
            owner_id,
            category,
            amount,
            date,
            description: String::new(),
        }
    }

    /// The category of the expense as a [Category].
    pub fn category(&self) -> Category {
        Category {
            id: self.category_id,
            name: self.category_name.clone(),
        }
    }
}

/// A builder for creating [Expense] instances.
///
/// Stores take a builder and assign the ID themselves. Call
/// [ExpenseBuilder::finalize] to turn a builder into an [Expense] directly.
///
/// # Examples
///
/// ```ignore
/// use rust_decimal_macros::dec;
/// use time::macros::date;
///
/// let expense = Expense::build(1, food, dec!(50000), date!(2025 - 07 - 05))
///     .description("Lunch")
///     .finalize(1)
///     .unwrap();
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct ExpenseBuilder {
    /// The user the expense is recorded for.
    pub owner_id: UserId,

    /// The category of the expense, e.g. "Food", "Transport", "Rent".
    pub category: Category,

    /// The amount of money spent.
    ///
    /// Must be greater than zero.
    pub amount: Decimal,

    /// The date when the money was spent.
    pub date: Date,

    /// A human-readable description of the expense.
    ///
    /// # Examples
    /// - `"Lunch"`
    /// - `"Train ticket to Hanoi"`
    pub description: String,
}

impl ExpenseBuilder {
    /// Set the description for the expense.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Check that the builder describes a valid expense.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NonPositiveAmount] if the amount is zero or negative,
    /// - or [Error::EmptyDescription] if the description is blank.
    pub fn validate(&self) -> Result<(), Error> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount(self.amount));
        }

        if self.description.trim().is_empty() {
            return Err(Error::EmptyDescription);
        }

        Ok(())
    }

    /// Create the [Expense] with the given `id`.
    ///
    /// # Errors
    /// Returns the same errors as [ExpenseBuilder::validate].
    pub fn finalize(self, id: ExpenseId) -> Result<Expense, Error> {
        self.validate()?;

        Ok(Expense {
            id,
            amount: self.amount,
            description: self.description,
            date: self.date,
            category_id: self.category.id,
            category_name: self.category.name,
            owner_id: self.owner_id,
        })
    }
}
