//! Writes expenses out as CSV or as an Excel workbook.

use std::io::Write;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::{Error, Expense, ExpenseId};

/// The header row written at the top of every export.
pub const CSV_HEADER: [&str; 5] = ["ID", "Amount", "Description", "Date", "Category"];

/// The name of the worksheet [write_xlsx] puts the expenses in.
pub const XLSX_SHEET_NAME: &str = "Expenses";

/// The UTF-8 byte order mark, which helps spreadsheet programs detect the encoding.
pub const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// One row of an expense export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The exact amount with at least two decimal places, e.g. "50000.00" or "1.005".
    pub amount: String,
    /// The description of the expense.
    pub description: String,
    /// The date of the expense as `YYYY-MM-DD`.
    pub date: String,
    /// The name of the expense's category.
    pub category: String,
}

impl ExportRow {
    fn as_record(&self) -> [String; 5] {
        [
            self.id.to_string(),
            self.amount.clone(),
            self.description.clone(),
            self.date.clone(),
            self.category.clone(),
        ]
    }
}

impl From<&Expense> for ExportRow {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id,
            amount: format_amount(expense.amount),
            description: expense.description.clone(),
            date: expense.date.to_string(),
            category: expense.category_name.to_string(),
        }
    }
}

/// Formats `amount` with at least two decimal places.
///
/// Amounts are never rounded, so reading the text back gives the same value.
fn format_amount(amount: Decimal) -> String {
    let mut padded = amount;

    if padded.scale() < 2 {
        padded.rescale(2);
    }

    padded.to_string()
}

/// Write `expenses` to `writer` as CSV, header first.
///
/// The header is written even when there are no expenses.
///
/// # Errors
/// Returns [Error::ExportError] if writing to `writer` fails.
pub fn write_csv<W: Write>(expenses: &[Expense], writer: W) -> Result<(), Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(CSV_HEADER).map_err(export_error)?;

    for expense in expenses {
        csv_writer
            .write_record(ExportRow::from(expense).as_record())
            .map_err(export_error)?;
    }

    csv_writer
        .flush()
        .map_err(|error| Error::ExportError(error.to_string()))
}

/// Write [UTF8_BOM] followed by the output of [write_csv].
///
/// # Errors
/// Returns [Error::ExportError] if writing to `writer` fails.
pub fn write_csv_with_bom<W: Write>(expenses: &[Expense], mut writer: W) -> Result<(), Error> {
    writer
        .write_all(UTF8_BOM)
        .map_err(|error| Error::ExportError(error.to_string()))?;

    write_csv(expenses, writer)
}

fn export_error(error: csv::Error) -> Error {
    Error::ExportError(error.to_string())
}

/// Write `expenses` to `writer` as an Excel workbook.
///
/// The workbook has one sheet named [XLSX_SHEET_NAME] with the same columns as
/// [write_csv]. IDs and amounts are written as numbers, amounts shown with two
/// decimal places. The other columns are written as text.
///
/// # Errors
/// Returns [Error::ExportError] if the workbook cannot be built or writing to
/// `writer` fails.
pub fn write_xlsx<W: Write>(expenses: &[Expense], mut writer: W) -> Result<(), Error> {
    let mut workbook = Workbook::new();
    let amount_format = Format::new().set_num_format("0.00");
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(XLSX_SHEET_NAME).map_err(xlsx_error)?;

    for (column, title) in (0u16..).zip(CSV_HEADER) {
        worksheet.write_string(0, column, title).map_err(xlsx_error)?;
    }

    for (row_number, expense) in (1u32..).zip(expenses) {
        let row = ExportRow::from(expense);
        let amount = expense.amount.to_f64().ok_or_else(|| {
            Error::ExportError(format!("the amount {} is too large", expense.amount))
        })?;

        worksheet
            .write_number(row_number, 0, row.id as f64)
            .map_err(xlsx_error)?;
        worksheet
            .write_number_with_format(row_number, 1, amount, &amount_format)
            .map_err(xlsx_error)?;
        worksheet
            .write_string(row_number, 2, row.description)
            .map_err(xlsx_error)?;
        worksheet
            .write_string(row_number, 3, row.date)
            .map_err(xlsx_error)?;
        worksheet
            .write_string(row_number, 4, row.category)
            .map_err(xlsx_error)?;
    }

    let buffer = workbook.save_to_buffer().map_err(xlsx_error)?;
    tracing::debug!("Wrote {} expenses to a workbook", expenses.len());

    writer
        .write_all(&buffer)
        .map_err(|error| Error::ExportError(error.to_string()))
}

fn xlsx_error(error: XlsxError) -> Error {
    Error::ExportError(error.to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        export::{
            ExportRow, UTF8_BOM, XLSX_SHEET_NAME, format_amount, write_csv, write_csv_with_bom,
            write_xlsx,
        },
        test_utils::expense,
    };

    fn read_xlsx_rows(buffer: Vec<u8>) -> Vec<Vec<Data>> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(buffer)).unwrap();
        let range = workbook.worksheet_range(XLSX_SHEET_NAME).unwrap();

        range.rows().map(|row| row.to_vec()).collect()
    }

    #[test]
    fn export_row_formats_fields() {
        let mut lunch = expense(3, "50000", date!(2025 - 07 - 05), 1, "Food");
        lunch.description = "Lunch".to_owned();

        let row = ExportRow::from(&lunch);

        assert_eq!(
            row,
            ExportRow {
                id: 3,
                amount: "50000.00".to_owned(),
                description: "Lunch".to_owned(),
                date: "2025-07-05".to_owned(),
                category: "Food".to_owned(),
            }
        );
    }

    #[test]
    fn format_amount_pads_to_two_decimal_places() {
        assert_eq!(format_amount(dec!(7)), "7.00");
        assert_eq!(format_amount(dec!(0.5)), "0.50");
        assert_eq!(format_amount(dec!(12.34)), "12.34");
    }

    #[test]
    fn format_amount_keeps_sub_cent_digits() {
        assert_eq!(format_amount(dec!(1.005)), "1.005");
        assert_eq!(format_amount(dec!(0.0001)), "0.0001");
    }

    #[test]
    fn write_csv_writes_header_and_rows() {
        let expenses = vec![
            expense(1, "100000", date!(2025 - 07 - 01), 1, "Food"),
            expense(2, "45.5", date!(2025 - 07 - 06), 2, "Books"),
        ];
        let mut buffer = Vec::new();

        write_csv(&expenses, &mut buffer).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "ID,Amount,Description,Date,Category\n\
             1,100000.00,Expense #1,2025-07-01,Food\n\
             2,45.50,Expense #2,2025-07-06,Books\n"
        );
    }

    #[test]
    fn write_csv_quotes_descriptions_with_commas() {
        let mut groceries = expense(1, "12", date!(2025 - 07 - 01), 1, "Food");
        groceries.description = "Milk, eggs".to_owned();
        let mut buffer = Vec::new();

        write_csv(&[groceries], &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("\"Milk, eggs\""), "got {text}");
    }

    #[test]
    fn write_csv_with_no_expenses_writes_header_only() {
        let mut buffer = Vec::new();

        write_csv(&[], &mut buffer).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "ID,Amount,Description,Date,Category\n"
        );
    }

    #[test]
    fn write_csv_with_bom_prefixes_byte_order_mark() {
        let mut buffer = Vec::new();

        write_csv_with_bom(&[], &mut buffer).unwrap();

        assert!(buffer.starts_with(UTF8_BOM));
        assert_eq!(
            &buffer[UTF8_BOM.len()..],
            b"ID,Amount,Description,Date,Category\n"
        );
    }

    #[test]
    fn write_xlsx_writes_header_and_rows() {
        let mut lunch = expense(1, "100000", date!(2025 - 07 - 01), 1, "Food");
        lunch.description = "Lunch".to_owned();
        let expenses = vec![lunch, expense(2, "45.5", date!(2025 - 07 - 06), 2, "Books")];
        let mut buffer = Vec::new();

        write_xlsx(&expenses, &mut buffer).unwrap();

        let rows = read_xlsx_rows(buffer);
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            vec![
                Data::String("ID".to_owned()),
                Data::String("Amount".to_owned()),
                Data::String("Description".to_owned()),
                Data::String("Date".to_owned()),
                Data::String("Category".to_owned()),
            ]
        );
        assert_eq!(
            rows[1],
            vec![
                Data::Float(1.0),
                Data::Float(100000.0),
                Data::String("Lunch".to_owned()),
                Data::String("2025-07-01".to_owned()),
                Data::String("Food".to_owned()),
            ]
        );
        assert_eq!(rows[2][1], Data::Float(45.5));
        assert_eq!(rows[2][4], Data::String("Books".to_owned()));
    }

    #[test]
    fn write_xlsx_with_no_expenses_writes_header_only() {
        let mut buffer = Vec::new();

        write_xlsx(&[], &mut buffer).unwrap();

        let rows = read_xlsx_rows(buffer);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], Data::String("ID".to_owned()));
    }
}
