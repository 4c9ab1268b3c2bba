#[cfg(test)]
mod tests;
mod transaction;

use serde::Serialize;
use std::fmt;
use std::fmt::{Display, Formatter};

pub use transaction::Transaction;

/// Recorded gender of the purchasing customer.
///
/// The declaration order gives the ascending (alphabetical) ordering used
/// when gender appears as a grouping key.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub enum Gender {
    Female,
    Male
}

impl Display for Gender {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Gender::Female => "Female",
            Gender::Male => "Male"
        };

        write!(formatter, "{}", label)
    }
}
