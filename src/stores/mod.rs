//! Contains traits and implementations for objects that store [expenses](crate::Expense),
//! [categories](crate::Category) and [budgets](crate::Budget).

mod budget;
mod category;
mod expense;
mod memory;

pub mod sqlite;

pub use budget::BudgetStore;
pub use category::CategoryStore;
pub use expense::ExpenseStore;
pub use memory::MemoryExpenseStore;
pub use sqlite::{SQLiteBudgetStore, SQLiteCategoryStore, SQLiteExpenseStore};
