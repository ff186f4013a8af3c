//! Reads expenses from CSV files in the format written by [crate::export].

use std::{
    collections::{HashMap, HashSet},
    str::FromStr,
};

use rust_decimal::Decimal;

use crate::{
    Category, CategoryId, CategoryName, Error, Expense, ExpenseId, UserId, export::CSV_HEADER,
    parse_iso_date,
};

const ID_COLUMN: usize = 0;
const AMOUNT_COLUMN: usize = 1;
const DESCRIPTION_COLUMN: usize = 2;
const DATE_COLUMN: usize = 3;
const CATEGORY_COLUMN: usize = 4;

/// Parses expenses from CSV text with the columns `ID,Amount,Description,Date,Category`.
///
/// A leading UTF-8 byte order mark is ignored. Every expense is given
/// `owner_id` as its owner. Category IDs are assigned by category name in the
/// order the names first appear, starting from 1.
///
/// # Errors
/// Returns [Error::InvalidCSV] naming the offending line if the header is
/// wrong, a field cannot be parsed, an expense is invalid, or an ID appears
/// more than once.
pub fn parse_expenses_csv(text: &str, owner_id: UserId) -> Result<Vec<Expense>, Error> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|error| Error::InvalidCSV(format!("could not read header: {error}")))?;

    if headers.iter().ne(CSV_HEADER) {
        return Err(Error::InvalidCSV(format!(
            "expected header '{}' but got '{}'",
            CSV_HEADER.join(","),
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut expenses = Vec::new();
    let mut seen_ids: HashSet<ExpenseId> = HashSet::new();
    let mut category_ids: HashMap<CategoryName, CategoryId> = HashMap::new();

    for record in reader.records() {
        let record =
            record.map_err(|error| Error::InvalidCSV(format!("could not read row: {error}")))?;
        let line_number = record.position().map_or(0, |position| position.line());

        let field = |column: usize| record.get(column).unwrap_or_default();
        let invalid = |what: &str, value: &str, error: &dyn std::fmt::Display| {
            Error::InvalidCSV(format!(
                "Could not parse '{value}' as {what} on line {line_number}: {error}"
            ))
        };

        let id: ExpenseId = field(ID_COLUMN)
            .parse()
            .map_err(|error| invalid("ID", field(ID_COLUMN), &error))?;
        let amount = Decimal::from_str(field(AMOUNT_COLUMN))
            .map_err(|error| invalid("amount", field(AMOUNT_COLUMN), &error))?;
        let date = parse_iso_date(field(DATE_COLUMN))
            .map_err(|error| invalid("date", field(DATE_COLUMN), &error))?;
        let category_name = CategoryName::new(field(CATEGORY_COLUMN))
            .map_err(|error| invalid("category", field(CATEGORY_COLUMN), &error))?;

        if !seen_ids.insert(id) {
            return Err(Error::InvalidCSV(format!(
                "the ID {id} on line {line_number} appears more than once"
            )));
        }

        let next_category_id = category_ids.len() as CategoryId + 1;
        let category_id = *category_ids
            .entry(category_name.clone())
            .or_insert(next_category_id);
        let category = Category {
            id: category_id,
            name: category_name,
        };

        let expense = Expense::build(owner_id, category, amount, date)
            .description(field(DESCRIPTION_COLUMN))
            .finalize(id)
            .map_err(|error| {
                Error::InvalidCSV(format!("invalid expense on line {line_number}: {error}"))
            })?;

        expenses.push(expense);
    }

    tracing::debug!("Parsed {} expenses from CSV", expenses.len());

    Ok(expenses)
}
