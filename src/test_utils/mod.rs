//! Helpers shared by the unit tests.

use std::str::FromStr;

use rust_decimal::Decimal;
use time::Date;

use crate::{CategoryId, CategoryName, Expense, ExpenseId};

/// The owner used for expenses created with [expense].
pub const TEST_OWNER: crate::UserId = 1;

/// Create an expense owned by [TEST_OWNER].
///
/// `amount` is parsed as an exact decimal, e.g. `"100000"` or `"12.34"`.
pub fn expense(
    id: ExpenseId,
    amount: &str,
    date: Date,
    category_id: CategoryId,
    category_name: &str,
) -> Expense {
    Expense {
        id,
        amount: Decimal::from_str(amount).unwrap(),
        description: format!("Expense #{id}"),
        date,
        category_id,
        category_name: CategoryName::new_unchecked(category_name),
        owner_id: TEST_OWNER,
    }
}
