use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use expense_tracker::{
    CategoryId, Error, ExpenseFilter, ExpenseService, ExpenseStore, MemoryExpenseStore, UserId,
    export::{write_csv_with_bom, write_xlsx},
    import::parse_expenses_csv,
    parse_iso_date,
};

/// Filter and summarise the expenses in a CSV file.
///
/// The file must have the columns `ID,Amount,Description,Date,Category`, the
/// same format the `export` command writes.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the CSV file of expenses.
    #[arg(long, env = "EXPENSE_CSV_PATH")]
    csv_path: PathBuf,

    /// The ID of the user the expenses belong to.
    #[arg(long, env = "EXPENSE_OWNER_ID", default_value_t = 1)]
    owner: UserId,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the expenses that match the filter.
    List(FilterArgs),
    /// Total of the expenses between two dates, across all categories.
    Total(DateRangeArgs),
    /// Total of the expenses that match the filter.
    FilteredTotal(FilterArgs),
    /// Total spent in each category.
    ByCategory,
    /// Total spent in each month.
    ByMonth,
    /// Write the expenses that match the filter as CSV or as an Excel workbook.
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// The file format to write.
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Csv,
    Xlsx,
}

#[derive(clap::Args, Debug)]
struct DateRangeArgs {
    /// Only include expenses on or after this date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    start_date: Option<Date>,

    /// Only include expenses on or before this date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    end_date: Option<Date>,
}

#[derive(clap::Args, Debug)]
struct FilterArgs {
    /// Only include expenses in this category.
    #[arg(long)]
    category_id: Option<CategoryId>,

    #[command(flatten)]
    dates: DateRangeArgs,

    /// A URL query string such as `categoryId=1&startDate=2025-07-01`.
    ///
    /// Parameters that cannot be parsed are ignored.
    #[arg(long, conflicts_with_all = ["category_id", "start_date", "end_date"])]
    query: Option<String>,
}

impl From<&FilterArgs> for ExpenseFilter {
    fn from(args: &FilterArgs) -> Self {
        match &args.query {
            Some(query) => ExpenseFilter::from_query(query),
            None => ExpenseFilter::date_range(args.dates.start_date, args.dates.end_date)
                .category(args.category_id),
        }
    }
}

#[derive(Serialize)]
struct Total {
    total: Decimal,
}

fn parse_date(text: &str) -> Result<Date, String> {
    parse_iso_date(text).map_err(|error| format!("expected a date like 2025-07-31: {error}"))
}

fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Error> {
    let text = fs::read_to_string(&args.csv_path).map_err(|error| {
        Error::IoError(format!("{}: {error}", args.csv_path.display()))
    })?;
    let expenses = parse_expenses_csv(&text, args.owner)?;
    tracing::info!(
        "Loaded {} expenses from {}",
        expenses.len(),
        args.csv_path.display()
    );

    let service = ExpenseService::new(MemoryExpenseStore::from_expenses(expenses));

    execute(&args.command, &service, args.owner, io::stdout().lock())
}

/// Run `command` for `owner` and write its output to `out`.
fn execute<S: ExpenseStore, W: Write>(
    command: &Command,
    service: &ExpenseService<S>,
    owner: UserId,
    mut out: W,
) -> Result<(), Error> {
    match command {
        Command::List(filter) => {
            write_json(&mut out, &service.filter_expenses(owner, &filter.into())?)
        }
        Command::Total(dates) => write_json(
            &mut out,
            &Total {
                total: service.total_amount(owner, dates.start_date, dates.end_date)?,
            },
        ),
        Command::FilteredTotal(filter) => write_json(
            &mut out,
            &Total {
                total: service.filtered_total(owner, &filter.into())?,
            },
        ),
        Command::ByCategory => write_json(&mut out, &service.stats_by_category(owner)?),
        Command::ByMonth => write_json(&mut out, &service.stats_by_month(owner)?),
        Command::Export { filter, format } => {
            let expenses = service.filter_expenses(owner, &filter.into())?;

            match format {
                ExportFormat::Csv => write_csv_with_bom(&expenses, out),
                ExportFormat::Xlsx => write_xlsx(&expenses, out),
            }
        }
    }
}

fn write_json<T: Serialize, W: Write>(out: &mut W, value: &T) -> Result<(), Error> {
    serde_json::to_writer_pretty(&mut *out, value)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    writeln!(out).map_err(|error| Error::IoError(error.to_string()))
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
