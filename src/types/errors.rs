use thiserror::Error;

#[derive(Debug, Error)]
pub enum YearMonthError {
    #[error("Year-month error: {0}")]
    InvalidFormat(String),
    #[error("Year-month error: Month [{month}] is not between 1 and 12")]
    MonthOutOfRange {
        month: u32
    }
}
