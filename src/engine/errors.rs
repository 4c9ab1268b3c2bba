use thiserror::Error;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum AggregateError {
    /// An averaging operation found zero eligible rows. Surfaced as a typed
    /// failure so "no data" is never reported as an average of zero.
    #[error("No records with a known age were found for category [{category}]")]
    EmptyAggregate {
        category: String
    }
}

impl AggregateError {
    pub fn empty_aggregate(category: &str) -> Self {
        Self::EmptyAggregate {
            category: category.to_string()
        }
    }
}
