mod csv_loader;
mod errors;

use crate::models::Transaction;

pub use csv_loader::{CsvLoader, MalformedPolicy};
pub use errors::{LoadError, RecordIssue};

/// Supplies the initial, finite dataset the aggregator runs over.
///
/// Implementations own all type coercion; absent values reach the rest of
/// the system only as `None`, never as sentinels.
pub trait DatasetSource {
    fn load(&self) -> Result<LoadOutcome, LoadError>;
}

/// The materialized dataset plus every record rejected during coercion.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub transactions: Vec<Transaction>,
    pub skipped: Vec<RecordIssue>
}
