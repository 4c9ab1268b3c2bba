mod engine;
mod loader;
mod models;
mod types;

use std::io::{stdout, BufWriter, Write};
use std::iter::once;
use std::process::exit;
use std::str::FromStr;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::engine::Aggregator;
use crate::loader::{CsvLoader, DatasetSource};
use crate::models::Transaction;
use crate::types::YearMonth;

fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let log_level = extract_log_level(&mut args);

    setup_logging(log_level);

    if args.len() < 2 {
        print_usage();
        exit(1);
    }

    let path = args.remove(0);
    let query = args.remove(0);

    let timer = Instant::now();
    let outcome = CsvLoader::new(&path).load()?;
    let duration = timer.elapsed();

    info!("Loaded {} record(s) in: {duration:?}", outcome.transactions.len());

    if !outcome.skipped.is_empty() {
        info!("Skipped {} malformed record(s) during load", outcome.skipped.len());
    }

    run_query(&outcome.transactions, &query, &args)
}

fn extract_log_level(args: &mut Vec<String>) -> LevelFilter {
    let Some(index) = args.iter().position(|arg| arg == "--log") else {
        return LevelFilter::ERROR;
    };

    args.remove(index);

    if index < args.len() {
        parse_log_level(&args.remove(index))
    } else {
        eprintln!("Missing value for --log, defaulting to 'error'");
        LevelFilter::ERROR
    }
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: Query results go to stdout, so logging has to stay on stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn print_usage() {
    eprintln!("Usage: sales-analytics-engine [input].csv [query] [params...] [--log level]");
    eprintln!("Available log levels: error, warn, info, debug, trace (default: error)");
    eprintln!("Queries:");
    eprintln!("  count-all");
    eprintln!("  distinct-customers");
    eprintln!("  categories");
    eprintln!("  incomplete");
    eprintln!("  filter-complete");
    eprintln!("  by-date <YYYY-MM-DD>");
    eprintln!("  category-month <category> <YYYY-MM> <min-qty>");
    eprintln!("  totals-by-category");
    eprintln!("  average-age <category>");
    eprintln!("  high-value <threshold>");
    eprintln!("  gender-category");
    eprintln!("  best-month-per-year");
    eprintln!("  top-customers <k>");
    eprintln!("  unique-customers");
    eprintln!("  shifts");
}

fn run_query(dataset: &[Transaction], query: &str, params: &[String]) -> Result<()> {
    let aggregator = Aggregator::new(dataset);

    match query {
        "count-all" => print_rows("count", once(aggregator.count_all().to_string()))?,
        "distinct-customers" => {
            print_rows("customers", once(aggregator.count_distinct_customers().to_string()))?
        }
        "categories" => print_rows("category", aggregator.distinct_categories())?,
        "incomplete" => print_transactions(aggregator.find_incomplete())?,
        "filter-complete" => {
            let complete = aggregator.filter_complete();
            print_transactions(complete.iter())?
        }
        "by-date" => {
            let date = NaiveDate::parse_from_str(param(params, 0, "date")?, "%Y-%m-%d")
                .context("Date parameter must use the YYYY-MM-DD form")?;
            print_transactions(aggregator.by_date(date))?
        }
        "category-month" => {
            let category = param(params, 0, "category")?;
            let month = YearMonth::from_str(param(params, 1, "month")?)?;
            let min_qty: u32 = param(params, 2, "min-qty")?
                .parse()
                .context("Minimum quantity must be a non-negative integer")?;
            print_transactions(aggregator.by_category_month_min_qty(category, month, min_qty))?
        }
        "totals-by-category" => {
            let rows = aggregator.totals_by_category()
                .into_iter()
                .map(|entry| format!("{},{},{}", entry.category, entry.net_sale, entry.orders));
            print_rows("category,net_sale,orders", rows)?
        }
        "average-age" => {
            let average = aggregator.average_age(param(params, 0, "category")?)?;
            print_rows("average_age", once(average.to_string()))?
        }
        "high-value" => {
            let threshold = Decimal::from_str(param(params, 0, "threshold")?)
                .context("Threshold must be a decimal number")?;
            print_transactions(aggregator.high_value(threshold))?
        }
        "gender-category" => {
            let rows = aggregator.by_gender_and_category()
                .into_iter()
                .map(|entry| format!(
                    "{},{},{}",
                    entry.category,
                    entry.gender.map(|gender| gender.to_string()).unwrap_or_default(),
                    entry.orders
                ));
            print_rows("category,gender,orders", rows)?
        }
        "best-month-per-year" => {
            let rows = aggregator.best_month_per_year()
                .into_iter()
                .map(|best| format!("{},{},{}", best.year, best.month, best.average_sale));
            print_rows("year,month,average_sale", rows)?
        }
        "top-customers" => {
            let k: usize = param(params, 0, "k")?
                .parse()
                .context("k must be a non-negative integer")?;
            let rows = aggregator.top_customers(k)
                .into_iter()
                .map(|spend| format!(
                    "{},{}",
                    spend.customer.map(|customer| customer.to_string()).unwrap_or_default(),
                    spend.net_sale
                ));
            print_rows("customer,net_sale", rows)?
        }
        "unique-customers" => {
            let rows = aggregator.unique_customers_by_category()
                .into_iter()
                .map(|entry| format!("{},{}", entry.category, entry.customers));
            print_rows("category,customers", rows)?
        }
        "shifts" => {
            let report = aggregator.orders_by_shift();
            let rows = report.counts
                .into_iter()
                .map(|(shift, orders)| format!("{shift},{orders}"))
                .chain(once(format!("unshiftable,{}", report.unshiftable)));
            print_rows("shift,orders", rows)?
        }
        _ => {
            print_usage();
            return Err(anyhow!("Unknown query [{query}]"));
        }
    }

    Ok(())
}

fn param<'a>(params: &'a [String], index: usize, name: &str) -> Result<&'a str> {
    params.get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("Missing required parameter [{name}]"))
}

fn print_rows(header: &str, rows: impl IntoIterator<Item = String>) -> Result<()> {
    let mut output = BufWriter::new(stdout().lock());

    writeln!(output, "{header}")?;

    for row in rows {
        writeln!(output, "{row}")?;
    }

    output.flush()?;

    Ok(())
}

fn print_transactions<'a>(rows: impl IntoIterator<Item = &'a Transaction>) -> Result<()> {
    let mut writer = csv::Writer::from_writer(stdout().lock());

    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;

    Ok(())
}
