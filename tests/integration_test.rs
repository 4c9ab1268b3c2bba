use std::path::Path;
use std::process::{Command, Output};

use anyhow::{anyhow, Result};

fn run_query(query: &str, params: &[&str]) -> Result<Output> {
    let binary_path = env!("CARGO_BIN_EXE_sales-analytics-engine");
    let sample_path = Path::new("samples").join("sales.csv");

    let output = Command::new(binary_path)
        .arg(sample_path)
        .arg(query)
        .args(params)
        .output()?;

    Ok(output)
}

fn stdout_lines(output: &Output) -> Result<Vec<String>> {
    let stdout = String::from_utf8(output.stdout.clone())?;

    Ok(stdout.lines().map(str::to_string).collect())
}

#[test]
fn test_cli_counts_every_record_in_the_sample() -> Result<()> {
    let output = run_query("count-all", &[])?;

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output)?, vec!["count", "12"]);

    let output = run_query("distinct-customers", &[])?;

    assert_eq!(stdout_lines(&output)?, vec!["customers", "8"]);

    Ok(())
}

#[test]
fn test_cli_ranks_category_totals_with_nulls_as_zero() -> Result<()> {
    let output = run_query("totals-by-category", &[])?;

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output)?, vec![
        "category,net_sale,orders",
        "Electronics,2199,3",
        "Beauty,1880,4",
        "Clothing,1210,5",
    ]);

    Ok(())
}

#[test]
fn test_cli_shift_report_includes_zero_and_unshiftable_buckets() -> Result<()> {
    let output = run_query("shifts", &[])?;

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output)?, vec![
        "shift,orders",
        "Morning,4",
        "Afternoon,4",
        "Evening,3",
        "unshiftable,1",
    ]);

    Ok(())
}

#[test]
fn test_cli_averages_age_over_known_values_only() -> Result<()> {
    let output = run_query("average-age", &["Beauty"])?;

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output)?, vec!["average_age", "40.67"]);

    Ok(())
}

#[test]
fn test_cli_average_age_fails_cleanly_when_no_rows_match() -> Result<()> {
    let output = run_query("average-age", &["Groceries"])?;

    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr)?;

    assert!(stderr.contains("No records with a known age"));

    Ok(())
}

#[test]
fn test_cli_lists_top_customers_by_spend() -> Result<()> {
    let output = run_query("top-customers", &["3"])?;

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output)?, vec![
        "customer,net_sale",
        "2,1800",
        "7,999",
        "1,800",
    ]);

    Ok(())
}

#[test]
fn test_cli_reports_best_month_for_each_year() -> Result<()> {
    let output = run_query("best-month-per-year", &[])?;

    assert!(output.status.success());

    let lines = stdout_lines(&output)?;

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "year,month,average_sale");
    assert!(lines[1].starts_with("2022,11,766.66"));
    assert_eq!(lines[2], "2023,3,999");

    Ok(())
}

#[test]
fn test_cli_ranks_category_reach_by_distinct_customers() -> Result<()> {
    let output = run_query("unique-customers", &[])?;

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output)?, vec![
        "category,customers",
        "Beauty,4",
        "Clothing,3",
        "Electronics,3",
    ]);

    Ok(())
}

#[test]
fn test_cli_emits_full_records_for_date_lookups() -> Result<()> {
    let output = run_query("by-date", &["2022-11-05"])?;

    assert!(output.status.success());

    let lines = stdout_lines(&output)?;

    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "id,sale_date,sale_time,customer_id,gender,age,category,quantity,price_per_unit,cogs,total_sale"
    );
    assert!(lines[1].starts_with("1,2022-11-05,09:00:00,1,Female,34,Clothing,5,"));
    assert!(lines[2].starts_with("2,2022-11-05,14:00:00,2,Male,41,Beauty,1,"));

    Ok(())
}

#[test]
fn test_cli_filters_high_value_and_incomplete_records() -> Result<()> {
    let output = run_query("high-value", &["500"])?;

    assert!(output.status.success());

    let ids: Vec<String> = stdout_lines(&output)?
        .into_iter()
        .skip(1)
        .filter_map(|line| line.split(',').next().map(str::to_string))
        .collect();

    assert_eq!(ids, vec!["2", "3", "7", "10"]);

    let output = run_query("incomplete", &[])?;
    let ids: Vec<String> = stdout_lines(&output)?
        .into_iter()
        .skip(1)
        .filter_map(|line| line.split(',').next().map(str::to_string))
        .collect();

    assert_eq!(ids, vec!["5", "7", "9", "11"]);

    Ok(())
}

#[test]
fn test_cli_filters_by_category_month_and_quantity() -> Result<()> {
    let output = run_query("category-month", &["Clothing", "2022-12", "2"])?;

    assert!(output.status.success());

    let lines = stdout_lines(&output)?;

    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("4,2022-12-01,"));

    Ok(())
}

#[test]
fn test_cli_rejects_unknown_queries_with_usage_help() -> Result<()> {
    let output = run_query("median-age", &[])?;

    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr)?;

    assert!(stderr.contains("Usage: sales-analytics-engine"));
    assert!(stderr.contains("Unknown query [median-age]"));

    Ok(())
}

#[test]
fn test_cli_requires_an_input_path_and_query() -> Result<()> {
    let binary_path = env!("CARGO_BIN_EXE_sales-analytics-engine");

    let output = Command::new(binary_path).output()?;

    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr)?;

    assert!(stderr.contains("Usage: sales-analytics-engine"));

    Ok(())
}

#[test]
fn test_cli_surfaces_missing_input_files() -> Result<()> {
    let binary_path = env!("CARGO_BIN_EXE_sales-analytics-engine");

    let output = Command::new(binary_path)
        .arg("missing.csv")
        .arg("count-all")
        .output()?;

    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr)?;

    assert!(stderr.contains("Failed to open CSV"));

    Ok(())
}

#[test]
fn test_cli_gender_category_breakdown_is_ordered() -> Result<()> {
    let output = run_query("gender-category", &[])?;

    assert!(output.status.success());

    let lines = stdout_lines(&output)?;

    assert_eq!(lines[0], "category,gender,orders");
    // The record with no recorded gender forms its own Clothing group,
    // sorted ahead of the known genders.
    assert!(lines.contains(&"Clothing,,1".to_string()));
    assert!(lines.contains(&"Beauty,Female,2".to_string()));
    assert!(lines.contains(&"Beauty,Male,2".to_string()));

    Ok(())
}
