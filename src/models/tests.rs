use super::{Gender, Transaction};

use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

fn create_complete_transaction(id: u32) -> Result<Transaction> {
    Ok(Transaction {
        id,
        sale_date: NaiveDate::from_ymd_opt(2022, 11, 5).ok_or_else(|| anyhow!("Invalid date"))?,
        sale_time: Some(NaiveTime::from_hms_opt(9, 0, 0).ok_or_else(|| anyhow!("Invalid time"))?),
        customer_id: Some(1),
        gender: Some(Gender::Female),
        age: Some(34),
        category: "Clothing".to_string(),
        quantity: Some(5),
        price_per_unit: Some(Decimal::from_str("100.0")?),
        cogs: Some(Decimal::from_str("35.5")?),
        total_sale: Some(Decimal::from_str("500.0")?)
    })
}

#[test]
fn test_record_with_every_field_present_is_complete() -> Result<()> {
    let transaction = create_complete_transaction(1)?;

    assert!(transaction.is_complete());

    Ok(())
}

#[test]
fn test_record_missing_any_nullable_field_is_incomplete() -> Result<()> {
    let mutations: Vec<fn(&mut Transaction)> = vec![
        |transaction| transaction.sale_time = None,
        |transaction| transaction.customer_id = None,
        |transaction| transaction.gender = None,
        |transaction| transaction.age = None,
        |transaction| transaction.quantity = None,
        |transaction| transaction.price_per_unit = None,
        |transaction| transaction.cogs = None,
        |transaction| transaction.total_sale = None,
    ];

    for mutate in mutations {
        let mut transaction = create_complete_transaction(1)?;
        mutate(&mut transaction);

        assert!(!transaction.is_complete());
    }

    Ok(())
}

#[test]
fn test_gender_ordering_is_alphabetical_with_unknown_first() {
    assert!(Gender::Female < Gender::Male);
    assert!(None < Some(Gender::Female));
}
