use crate::types::errors::YearMonthError;
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A calendar month within a specific year, used as a grouping and filter key.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month()
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        YearMonth::of(date) == *self
    }
}

impl Display for YearMonth {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = YearMonthError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        let Some((year_part, month_part)) = value.split_once('-') else {
            return Err(YearMonthError::InvalidFormat("Value must use the YYYY-MM form".to_string()));
        };

        let year: i32 = year_part.parse().map_err(|error| {
            YearMonthError::InvalidFormat(format!("Value has an invalid year part: {:?}", error))
        })?;

        let month: u32 = month_part.parse().map_err(|error| {
            YearMonthError::InvalidFormat(format!("Value has an invalid month part: {:?}", error))
        })?;

        if !(1..=12).contains(&month) {
            return Err(YearMonthError::MonthOutOfRange { month });
        }

        Ok(Self { year, month })
    }
}
