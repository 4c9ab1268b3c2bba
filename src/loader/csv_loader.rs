use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

use crate::loader::errors::{LoadError, RecordIssue};
use crate::loader::{DatasetSource, LoadOutcome};
use crate::models::{Gender, Transaction};
use crate::types::{CustomerId, TransactionId};

/// Controls what happens when a record fails coercion or validation.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MalformedPolicy {
    /// Log the issue, collect it in the outcome, keep loading.
    Skip,
    /// Fail the whole load on the first bad record.
    Abort
}

/// Reads the sales table from a CSV file.
///
/// Every field arrives as raw text and is coerced here; an empty field
/// becomes `None` for nullable columns and a reported issue for required
/// ones. Nothing is ever coerced to a default silently.
pub struct CsvLoader {
    path: String,
    policy: MalformedPolicy
}

/// A row exactly as it appears in the file, before coercion.
#[derive(Debug, Deserialize)]
struct RawRecord {
    id: Option<String>,
    sale_date: Option<String>,
    sale_time: Option<String>,
    customer_id: Option<String>,
    gender: Option<String>,
    age: Option<String>,
    category: Option<String>,
    quantity: Option<String>,
    price_per_unit: Option<String>,
    cogs: Option<String>,
    total_sale: Option<String>
}

impl CsvLoader {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            policy: MalformedPolicy::Skip
        }
    }

    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl DatasetSource for CsvLoader {
    fn load(&self) -> Result<LoadOutcome, LoadError> {
        let file = File::open(&self.path).map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source
        })?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let headers = reader.headers()?.clone();
        let mut outcome = LoadOutcome::default();
        let mut seen_ids = HashSet::<TransactionId>::new();

        for (index, result) in reader.records().enumerate() {
            let record = result?;
            //NOTE: The header occupies line 1, so the first data record falls back to line 2
            let line = record.position().map_or(index as u64 + 2, |position| position.line());

            let parsed = record
                .deserialize::<RawRecord>(Some(&headers))
                .map_err(|error| RecordIssue {
                    record: record.get(0).unwrap_or("?").to_string(),
                    line,
                    field: "row",
                    message: error.to_string()
                })
                .and_then(|raw| coerce(raw, line))
                .and_then(|transaction| {
                    if seen_ids.insert(transaction.id) {
                        Ok(transaction)
                    } else {
                        Err(issue(&transaction.id.to_string(), line, "id", "Duplicate transaction id"))
                    }
                });

            match parsed {
                Ok(transaction) => outcome.transactions.push(transaction),
                Err(record_issue) => {
                    warn!("{record_issue}");

                    match self.policy {
                        MalformedPolicy::Skip => outcome.skipped.push(record_issue),
                        MalformedPolicy::Abort => return Err(LoadError::Malformed(record_issue))
                    }
                }
            }
        }

        Ok(outcome)
    }
}

fn coerce(raw: RawRecord, line: u64) -> Result<Transaction, RecordIssue> {
    let record = raw.id.clone().unwrap_or_else(|| "?".to_string());

    let id: TransactionId = match raw.id.as_deref() {
        Some(text) => parse_number(&record, line, "id", text)?,
        None => return Err(issue(&record, line, "id", "Value is required"))
    };

    let sale_date = match raw.sale_date.as_deref() {
        Some(text) => parse_date(&record, line, "sale_date", text)?,
        None => return Err(issue(&record, line, "sale_date", "Value is required"))
    };

    let category = match raw.category {
        Some(category) => category,
        None => return Err(issue(&record, line, "category", "Value is required"))
    };

    let sale_time: Option<NaiveTime> = raw.sale_time.as_deref()
        .map(|text| parse_time(&record, line, "sale_time", text)).transpose()?;
    let customer_id: Option<CustomerId> = raw.customer_id.as_deref()
        .map(|text| parse_number(&record, line, "customer_id", text)).transpose()?;
    let gender: Option<Gender> = raw.gender.as_deref()
        .map(|text| parse_gender(&record, line, "gender", text)).transpose()?;
    let age: Option<u8> = raw.age.as_deref()
        .map(|text| parse_number(&record, line, "age", text)).transpose()?;
    let quantity: Option<u32> = raw.quantity.as_deref()
        .map(|text| parse_number(&record, line, "quantity", text)).transpose()?;
    let price_per_unit: Option<Decimal> = raw.price_per_unit.as_deref()
        .map(|text| parse_amount(&record, line, "price_per_unit", text)).transpose()?;
    let cogs: Option<Decimal> = raw.cogs.as_deref()
        .map(|text| parse_amount(&record, line, "cogs", text)).transpose()?;
    let total_sale: Option<Decimal> = raw.total_sale.as_deref()
        .map(|text| parse_number(&record, line, "total_sale", text)).transpose()?;

    Ok(Transaction {
        id,
        sale_date,
        sale_time,
        customer_id,
        gender,
        age,
        category,
        quantity,
        price_per_unit,
        cogs,
        total_sale
    })
}

fn issue(record: &str, line: u64, field: &'static str, message: impl Into<String>) -> RecordIssue {
    RecordIssue {
        record: record.to_string(),
        line,
        field,
        message: message.into()
    }
}

fn parse_number<T>(record: &str, line: u64, field: &'static str, text: &str) -> Result<T, RecordIssue>
where
    T: FromStr,
    T::Err: std::fmt::Display
{
    text.parse().map_err(|error: T::Err| issue(record, line, field, error.to_string()))
}

fn parse_date(record: &str, line: u64, field: &'static str, text: &str) -> Result<NaiveDate, RecordIssue> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|error| issue(record, line, field, error.to_string()))
}

fn parse_time(record: &str, line: u64, field: &'static str, text: &str) -> Result<NaiveTime, RecordIssue> {
    NaiveTime::parse_from_str(text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .map_err(|error| issue(record, line, field, error.to_string()))
}

fn parse_gender(record: &str, line: u64, field: &'static str, text: &str) -> Result<Gender, RecordIssue> {
    match text.to_lowercase().as_str() {
        "female" => Ok(Gender::Female),
        "male" => Ok(Gender::Male),
        _ => Err(issue(record, line, field, format!("Unrecognized gender [{}]", text)))
    }
}

fn parse_amount(record: &str, line: u64, field: &'static str, text: &str) -> Result<Decimal, RecordIssue> {
    let amount: Decimal = parse_number(record, line, field, text)?;

    if amount.is_sign_negative() {
        return Err(issue(record, line, field, "Value must not be negative"));
    }

    Ok(amount)
}
