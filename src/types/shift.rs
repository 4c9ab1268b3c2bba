use chrono::{NaiveTime, Timelike};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Coarse time-of-day bucket derived from a sale time's hour component.
///
/// The declaration order doubles as the tie-break order when two shifts
/// carry the same number of orders.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Shift {
    Morning,
    Afternoon,
    Evening
}

impl Shift {
    pub const ALL: [Shift; 3] = [Shift::Morning, Shift::Afternoon, Shift::Evening];

    /// Buckets a time-of-day: before 12:00 is Morning, 12:00 through 17:59
    /// is Afternoon, 18:00 onward is Evening.
    pub fn classify(time: NaiveTime) -> Self {
        match time.hour() {
            hour if hour < 12 => Shift::Morning,
            hour if hour <= 17 => Shift::Afternoon,
            _ => Shift::Evening
        }
    }
}

impl Display for Shift {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Shift::Morning => "Morning",
            Shift::Afternoon => "Afternoon",
            Shift::Evening => "Evening"
        };

        write!(formatter, "{}", label)
    }
}
