//! Optional criteria for selecting a subset of a user's expenses.

use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{CategoryId, Expense};

const ISO_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse a date in the `YYYY-MM-DD` format.
///
/// # Errors
/// Returns the underlying parse error if `text` is not a valid ISO 8601 calendar date.
pub fn parse_iso_date(text: &str) -> Result<Date, time::error::Parse> {
    Date::parse(text.trim(), &ISO_DATE_FORMAT)
}

/// Which expenses to include in a filtered list or total.
///
/// Every field is optional and a missing field places no restriction on the
/// result. The date bounds are inclusive and either may be set on its own to
/// get an open-ended range. The default filter matches every expense.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Only include expenses in this category.
    pub category_id: Option<CategoryId>,
    /// Only include expenses on or after this date.
    pub start_date: Option<Date>,
    /// Only include expenses on or before this date.
    pub end_date: Option<Date>,
}

/// The raw query string parameters, before any of them are parsed.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilterQuery {
    category_id: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
}

impl ExpenseFilter {
    /// A filter that restricts by date only.
    pub fn date_range(start_date: Option<Date>, end_date: Option<Date>) -> Self {
        Self {
            category_id: None,
            start_date,
            end_date,
        }
    }

    /// Set the category to restrict to.
    pub fn category(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Build a filter from a URL query string such as
    /// `categoryId=1&startDate=2025-07-01&endDate=2025-07-10`.
    ///
    /// Parameters that are missing, empty or cannot be parsed are treated as
    /// "no restriction" rather than as an error.
    pub fn from_query(query: &str) -> Self {
        let raw: FilterQuery = match serde_urlencoded::from_str(query.trim_start_matches('?')) {
            Ok(raw) => raw,
            Err(error) => {
                tracing::debug!("Ignoring unreadable filter query {query:?}: {error}");
                FilterQuery::default()
            }
        };

        Self {
            category_id: raw
                .category_id
                .as_deref()
                .and_then(|value| parse_param("categoryId", value, |v| v.parse().ok())),
            start_date: raw
                .start_date
                .as_deref()
                .and_then(|value| parse_param("startDate", value, |v| parse_iso_date(v).ok())),
            end_date: raw
                .end_date
                .as_deref()
                .and_then(|value| parse_param("endDate", value, |v| parse_iso_date(v).ok())),
        }
    }

    /// Whether `expense` satisfies every criterion that is set.
    pub fn matches(&self, expense: &Expense) -> bool {
        self.category_id
            .is_none_or(|category_id| expense.category_id == category_id)
            && self.start_date.is_none_or(|start| expense.date >= start)
            && self.end_date.is_none_or(|end| expense.date <= end)
    }
}

fn parse_param<T>(name: &str, value: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let value = value.trim();

    if value.is_empty() {
        return None;
    }

    let parsed = parse(value);

    if parsed.is_none() {
        tracing::debug!("Ignoring invalid filter parameter {name}={value:?}");
    }

    parsed
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{ExpenseFilter, parse_iso_date, test_utils::expense};

    #[test]
    fn default_filter_matches_everything() {
        let filter = ExpenseFilter::default();

        assert!(filter.matches(&expense(1, "10", date!(2025 - 07 - 01), 1, "Food")));
        assert!(filter.matches(&expense(2, "10", date!(1999 - 01 - 31), 2, "Books")));
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let filter =
            ExpenseFilter::date_range(Some(date!(2025 - 07 - 05)), Some(date!(2025 - 07 - 06)));

        assert!(!filter.matches(&expense(1, "10", date!(2025 - 07 - 04), 1, "Food")));
        assert!(filter.matches(&expense(2, "10", date!(2025 - 07 - 05), 1, "Food")));
        assert!(filter.matches(&expense(3, "10", date!(2025 - 07 - 06), 1, "Food")));
        assert!(!filter.matches(&expense(4, "10", date!(2025 - 07 - 07), 1, "Food")));
    }

    #[test]
    fn start_date_alone_is_open_ended() {
        let filter = ExpenseFilter::date_range(Some(date!(2025 - 07 - 05)), None);

        assert!(!filter.matches(&expense(1, "10", date!(2025 - 07 - 04), 1, "Food")));
        assert!(filter.matches(&expense(2, "10", date!(2099 - 12 - 31), 1, "Food")));
    }

    #[test]
    fn end_date_alone_is_open_ended() {
        let filter = ExpenseFilter::date_range(None, Some(date!(2025 - 07 - 05)));

        assert!(filter.matches(&expense(1, "10", date!(1970 - 01 - 01), 1, "Food")));
        assert!(!filter.matches(&expense(2, "10", date!(2025 - 07 - 06), 1, "Food")));
    }

    #[test]
    fn category_is_matched_by_id() {
        let filter = ExpenseFilter::default().category(Some(2));

        assert!(!filter.matches(&expense(1, "10", date!(2025 - 07 - 01), 1, "Food")));
        assert!(filter.matches(&expense(2, "10", date!(2025 - 07 - 01), 2, "Books")));
    }

    #[test]
    fn from_query_parses_all_parameters() {
        let filter =
            ExpenseFilter::from_query("categoryId=3&startDate=2025-07-01&endDate=2025-07-10");

        assert_eq!(
            filter,
            ExpenseFilter {
                category_id: Some(3),
                start_date: Some(date!(2025 - 07 - 01)),
                end_date: Some(date!(2025 - 07 - 10)),
            }
        );
    }

    #[test]
    fn from_query_accepts_leading_question_mark() {
        let filter = ExpenseFilter::from_query("?startDate=2025-07-01");

        assert_eq!(filter.start_date, Some(date!(2025 - 07 - 01)));
        assert_eq!(filter.category_id, None);
        assert_eq!(filter.end_date, None);
    }

    #[test]
    fn from_query_treats_invalid_parameters_as_absent() {
        let filter =
            ExpenseFilter::from_query("categoryId=food&startDate=yesterday&endDate=2025-13-01");

        assert_eq!(filter, ExpenseFilter::default());
    }

    #[test]
    fn from_query_treats_empty_parameters_as_absent() {
        let filter = ExpenseFilter::from_query("categoryId=&startDate=&endDate=2025-07-10");

        assert_eq!(
            filter,
            ExpenseFilter::date_range(None, Some(date!(2025 - 07 - 10)))
        );
    }

    #[test]
    fn from_query_handles_empty_string() {
        assert_eq!(ExpenseFilter::from_query(""), ExpenseFilter::default());
    }

    #[test]
    fn parse_iso_date_rejects_other_formats() {
        assert_eq!(parse_iso_date("2025-07-06").unwrap(), date!(2025 - 07 - 06));
        assert!(parse_iso_date("06/07/2025").is_err());
    }
}
