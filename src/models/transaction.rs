use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Gender;
use crate::types::{CustomerId, TransactionId};

/// A single row of the denormalized sales table.
///
/// Absent values are carried as `None`, never as sentinels like 0 or an
/// empty string; the loader owns that mapping. `total_sale` is logically
/// `quantity * price_per_unit` but the two are not reconciled here and may
/// diverge in source data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// Globally unique sale ID.
    pub id: TransactionId,
    /// Calendar date of the sale.
    pub sale_date: NaiveDate,
    /// Time of day of the sale, when recorded.
    pub sale_time: Option<NaiveTime>,
    /// The purchasing customer, when known.
    pub customer_id: Option<CustomerId>,
    pub gender: Option<Gender>,
    pub age: Option<u8>,
    /// Product category. Open set, compared by exact string equality.
    pub category: String,
    pub quantity: Option<u32>,
    pub price_per_unit: Option<Decimal>,
    /// Cost of goods sold.
    pub cogs: Option<Decimal>,
    pub total_sale: Option<Decimal>
}

impl Transaction {
    /// A record is complete when every nullable field carries a value.
    pub fn is_complete(&self) -> bool {
        self.sale_time.is_some()
            && self.customer_id.is_some()
            && self.gender.is_some()
            && self.age.is_some()
            && self.quantity.is_some()
            && self.price_per_unit.is_some()
            && self.cogs.is_some()
            && self.total_sale.is_some()
    }
}
