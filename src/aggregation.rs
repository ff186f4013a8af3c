//! Expense filtering and aggregation.
//!
//! Provides functions to filter a user's expenses, sum their amounts, and
//! group totals by category or by calendar month.
//!
//! Every function here is a pure function of its arguments: the input slice is
//! never modified and nothing is remembered between calls. Callers are
//! expected to pass in expenses that all belong to the same user.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;

use crate::{CategoryName, Expense, ExpenseFilter};

/// The total amount spent in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    /// The category name the total was grouped by.
    pub category: CategoryName,
    /// The sum of the amounts of every expense in the category.
    pub total: Decimal,
}

/// The total amount spent in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyStats {
    /// The month formatted as `YYYY-MM`, e.g. "2025-07".
    pub month: String,
    /// The sum of the amounts of every expense dated in the month.
    #[serde(rename = "totalAmount")]
    pub total: Decimal,
}

/// Selects the expenses that match `filter`.
///
/// The result keeps the relative order of `expenses`. A filter with no
/// criteria set returns every expense.
pub fn filter_expenses<'a>(expenses: &'a [Expense], filter: &ExpenseFilter) -> Vec<&'a Expense> {
    expenses
        .iter()
        .filter(|expense| filter.matches(expense))
        .collect()
}

/// Sums the amounts of the expenses dated between `start_date` and `end_date`
/// (inclusive).
///
/// Categories are ignored. Either bound may be `None` to leave that side of
/// the range open. Returns zero if no expense falls in the range.
pub fn total_amount(
    expenses: &[Expense],
    start_date: Option<Date>,
    end_date: Option<Date>,
) -> Decimal {
    filtered_total(expenses, &ExpenseFilter::date_range(start_date, end_date))
}

/// Sums the amounts of the expenses selected by [filter_expenses].
///
/// Returns zero if no expense matches.
pub fn filtered_total(expenses: &[Expense], filter: &ExpenseFilter) -> Decimal {
    filter_expenses(expenses, filter)
        .into_iter()
        .map(|expense| expense.amount)
        .sum()
}

/// Totals the expense amounts for each category name.
///
/// There is one row for each distinct category name in `expenses`, in the
/// order each name is first seen. Names are compared exactly, so "Food" and
/// "food" produce separate rows.
pub fn stats_by_category(expenses: &[Expense]) -> Vec<CategoryStats> {
    let mut stats: Vec<CategoryStats> = Vec::new();
    let mut row_for_category: HashMap<&CategoryName, usize> = HashMap::new();

    for expense in expenses {
        let row = *row_for_category
            .entry(&expense.category_name)
            .or_insert_with(|| {
                stats.push(CategoryStats {
                    category: expense.category_name.clone(),
                    total: Decimal::ZERO,
                });
                stats.len() - 1
            });

        stats[row].total += expense.amount;
    }

    stats
}

/// Totals the expense amounts for each calendar month.
///
/// There is one row for each month that has at least one expense, sorted
/// chronologically.
pub fn stats_by_month(expenses: &[Expense]) -> Vec<MonthlyStats> {
    let mut totals: BTreeMap<(i32, u8), Decimal> = BTreeMap::new();

    for expense in expenses {
        *totals.entry(month_of(expense.date)).or_insert(Decimal::ZERO) += expense.amount;
    }

    totals
        .into_iter()
        .map(|((year, month), total)| MonthlyStats {
            month: format!("{year:04}-{month:02}"),
            total,
        })
        .collect()
}

fn month_of(date: Date) -> (i32, u8) {
    (date.year(), u8::from(date.month()))
}
