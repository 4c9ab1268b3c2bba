use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::engine::errors::AggregateError;
use crate::engine::ranking::{group_by, rank_desc, top_n};
use crate::models::{Gender, Transaction};
use crate::types::{CustomerId, Shift, YearMonth};

/// Net sale and order count for one product category.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CategoryTotals {
    pub category: String,
    /// Sum of `total_sale` treating absent values as zero.
    pub net_sale: Decimal,
    /// Number of records in the category, absent sales included.
    pub orders: usize
}

/// Order count for one (category, gender) pair. An absent gender is its own
/// explicit group.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GenderCategoryCount {
    pub category: String,
    pub gender: Option<Gender>,
    pub orders: usize
}

/// The month with the highest average sale within one calendar year.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BestMonth {
    pub year: i32,
    pub month: u32,
    pub average_sale: Decimal
}

/// Lifetime spend of one customer. `customer` is `None` for the group of
/// records with no recorded customer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CustomerSpend {
    pub customer: Option<CustomerId>,
    pub net_sale: Decimal
}

/// Distinct-customer reach of one product category.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CategoryReach {
    pub category: String,
    pub customers: usize
}

/// Order counts per shift, plus the records that carry no sale time and
/// therefore cannot be bucketed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ShiftReport {
    /// All three shifts, ordered by count descending; ties resolve in
    /// Morning, Afternoon, Evening order.
    pub counts: Vec<(Shift, usize)>,
    pub unshiftable: usize
}

/// Answers the fixed analytical questions over an immutable sales dataset.
///
/// Every operation is a pure function of the borrowed dataset: no state is
/// kept between calls, results are deterministic for the same input
/// sequence, and an empty dataset yields empty or zero results rather than
/// a fault. The only fallible operation is [`Aggregator::average_age`].
pub struct Aggregator<'a> {
    dataset: &'a [Transaction]
}

impl<'a> Aggregator<'a> {
    pub fn new(dataset: &'a [Transaction]) -> Self {
        Self { dataset }
    }

    /// Counts every record, incomplete ones included.
    pub fn count_all(&self) -> usize {
        self.dataset.len()
    }

    /// Counts distinct customers. Records with no recorded customer do not
    /// contribute.
    pub fn count_distinct_customers(&self) -> usize {
        self.dataset.iter()
            .filter_map(|transaction| transaction.customer_id)
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn distinct_categories(&self) -> BTreeSet<String> {
        self.dataset.iter()
            .map(|transaction| transaction.category.clone())
            .collect()
    }

    /// Lazily yields every record missing at least one field. The iterator
    /// borrows the dataset, so it can be restarted by calling again.
    pub fn find_incomplete(&self) -> impl Iterator<Item = &'a Transaction> {
        self.dataset.iter().filter(|transaction| !transaction.is_complete())
    }

    /// Produces a new dataset holding only complete records. Models the
    /// optional cleanup step without mutating the original sequence.
    pub fn filter_complete(&self) -> Vec<Transaction> {
        self.dataset.iter()
            .filter(|transaction| transaction.is_complete())
            .cloned()
            .collect()
    }

    pub fn by_date(&self, date: NaiveDate) -> Vec<&'a Transaction> {
        self.dataset.iter()
            .filter(|transaction| transaction.sale_date == date)
            .collect()
    }

    /// Records in the given category and calendar month whose quantity is at
    /// least `min_qty`. An absent quantity cannot satisfy the bound and is
    /// excluded.
    pub fn by_category_month_min_qty(&self, category: &str, month: YearMonth, min_qty: u32) -> Vec<&'a Transaction> {
        self.dataset.iter()
            .filter(|transaction| transaction.category == category)
            .filter(|transaction| month.contains(transaction.sale_date))
            .filter(|transaction| transaction.quantity.is_some_and(|quantity| quantity >= min_qty))
            .collect()
    }

    /// Net sale and order count per category, highest net sale first; ties
    /// resolve by category name ascending.
    pub fn totals_by_category(&self) -> Vec<CategoryTotals> {
        let buckets = group_by(self.dataset.iter(), |transaction| transaction.category.clone());

        let totals = buckets.into_iter()
            .map(|(category, rows)| CategoryTotals {
                category,
                net_sale: net_sale(&rows),
                orders: rows.len()
            })
            .collect();

        rank_desc(totals, |entry| entry.net_sale, |entry| entry.category.clone())
    }

    /// Average age of customers in the category, over records with a known
    /// age, rounded to two decimal places half-up.
    ///
    /// # Errors
    /// Returns [`AggregateError::EmptyAggregate`] when no record in the
    /// category carries an age, so "no data" is distinguishable from an
    /// average of zero.
    pub fn average_age(&self, category: &str) -> Result<Decimal, AggregateError> {
        let ages: Vec<u64> = self.dataset.iter()
            .filter(|transaction| transaction.category == category)
            .filter_map(|transaction| transaction.age.map(u64::from))
            .collect();

        if ages.is_empty() {
            return Err(AggregateError::empty_aggregate(category));
        }

        let sum: u64 = ages.iter().sum();
        let average = Decimal::from(sum) / Decimal::from(ages.len() as u64);

        Ok(average.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Records whose total sale strictly exceeds the threshold. Records with
    /// no total sale are excluded.
    pub fn high_value(&self, threshold: Decimal) -> Vec<&'a Transaction> {
        self.dataset.iter()
            .filter(|transaction| transaction.total_sale.is_some_and(|sale| sale > threshold))
            .collect()
    }

    /// Order count per (category, gender) pair, category ascending then
    /// gender ascending with the unknown-gender group first.
    pub fn by_gender_and_category(&self) -> Vec<GenderCategoryCount> {
        let buckets = group_by(self.dataset.iter(), |transaction| {
            (transaction.category.clone(), transaction.gender)
        });

        buckets.into_iter()
            .map(|((category, gender), rows)| GenderCategoryCount {
                category,
                gender,
                orders: rows.len()
            })
            .collect()
    }

    /// For each calendar year, the month with the highest average total sale,
    /// years ascending.
    ///
    /// Averages ignore absent total sales entirely, so a month whose sales
    /// are all unrecorded is not a candidate; a year with no candidate month
    /// is omitted. Tied months resolve to the earliest.
    pub fn best_month_per_year(&self) -> Vec<BestMonth> {
        let years = group_by(self.dataset.iter(), |transaction| transaction.sale_date.year());

        years.into_iter()
            .filter_map(|(year, rows)| {
                let months = group_by(rows, |transaction| transaction.sale_date.month());

                let averages: Vec<(u32, Decimal)> = months.into_iter()
                    .filter_map(|(month, rows)| average_sale(&rows).map(|average| (month, average)))
                    .collect();

                rank_desc(averages, |entry| entry.1, |entry| entry.0)
                    .into_iter()
                    .next()
                    .map(|(month, average_sale)| BestMonth { year, month, average_sale })
            })
            .collect()
    }

    /// The `k` highest-spending customer groups by net sale, ties broken by
    /// customer id ascending with the unknown-customer group first. Returns
    /// fewer entries when fewer groups exist.
    pub fn top_customers(&self, k: usize) -> Vec<CustomerSpend> {
        let buckets = group_by(self.dataset.iter(), |transaction| transaction.customer_id);

        let spends = buckets.into_iter()
            .map(|(customer, rows)| CustomerSpend {
                customer,
                net_sale: net_sale(&rows)
            })
            .collect();

        top_n(spends, |spend| spend.net_sale, |spend| spend.customer, k)
    }

    /// Distinct-customer count per category, highest first; ties resolve by
    /// category name ascending. Records with no customer do not contribute
    /// to the counts.
    pub fn unique_customers_by_category(&self) -> Vec<CategoryReach> {
        let buckets = group_by(self.dataset.iter(), |transaction| transaction.category.clone());

        let reach = buckets.into_iter()
            .map(|(category, rows)| CategoryReach {
                category,
                customers: rows.iter()
                    .filter_map(|transaction| transaction.customer_id)
                    .collect::<HashSet<_>>()
                    .len()
            })
            .collect();

        rank_desc(reach, |entry| entry.customers, |entry| entry.category.clone())
    }

    /// Order count per shift, highest first. Records without a sale time are
    /// excluded from the buckets and reported as `unshiftable`; every shift
    /// appears in the result even at zero.
    pub fn orders_by_shift(&self) -> ShiftReport {
        let mut counts: BTreeMap<Shift, usize> = Shift::ALL.into_iter()
            .map(|shift| (shift, 0))
            .collect();
        let mut unshiftable = 0;

        for transaction in self.dataset {
            match transaction.sale_time {
                Some(time) => *counts.entry(Shift::classify(time)).or_default() += 1,
                None => unshiftable += 1
            }
        }

        let counts = rank_desc(
            counts.into_iter().collect(),
            |entry: &(Shift, usize)| entry.1,
            |entry| entry.0
        );

        ShiftReport { counts, unshiftable }
    }
}

fn net_sale(rows: &[&Transaction]) -> Decimal {
    rows.iter()
        .map(|transaction| transaction.total_sale.unwrap_or(Decimal::ZERO))
        .sum()
}

fn average_sale(rows: &[&Transaction]) -> Option<Decimal> {
    let sales: Vec<Decimal> = rows.iter()
        .filter_map(|transaction| transaction.total_sale)
        .collect();

    if sales.is_empty() {
        return None;
    }

    Some(sales.iter().copied().sum::<Decimal>() / Decimal::from(sales.len() as u64))
}
