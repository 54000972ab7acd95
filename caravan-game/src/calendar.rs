//! Trail calendar: non-leap Gregorian day arithmetic.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{DAYS_PER_MONTH, MONTH_NAMES, STARTING_MONTH, STARTING_YEAR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DateState {
    pub day: u8,
    /// Month number, 1 through 12.
    pub month: u8,
    pub year: u16,
}

impl Default for DateState {
    fn default() -> Self {
        Self::start_of(STARTING_MONTH)
    }
}

impl DateState {
    #[must_use]
    pub const fn new(day: u8, month: u8, year: u16) -> Self {
        Self { day, month, year }
    }

    /// First day of `month` in the starting year. Out-of-range months fall
    /// back to the default starting month.
    #[must_use]
    pub const fn start_of(month: u8) -> Self {
        let month = if month >= 1 && month <= 12 {
            month
        } else {
            STARTING_MONTH
        };
        Self {
            day: 1,
            month,
            year: STARTING_YEAR,
        }
    }

    /// The following calendar day. A day or month outside the calendar rolls
    /// over instead of overflowing.
    #[must_use]
    pub const fn advance_day(self) -> Self {
        let mut next = self;
        next.day = next.day.saturating_add(1);
        if next.day > days_in_month(next.month) {
            next.day = 1;
            if next.month >= 12 {
                next.month = 1;
                next.year = next.year.saturating_add(1);
            } else {
                next.month += 1;
            }
        }
        next
    }

    #[must_use]
    pub const fn advance_days(self, days: u32) -> Self {
        let mut date = self;
        let mut remaining = days;
        while remaining > 0 {
            date = date.advance_day();
            remaining -= 1;
        }
        date
    }

    #[must_use]
    pub const fn month_name(self) -> &'static str {
        month_name(self.month)
    }
}

impl fmt::Display for DateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}, {}", self.month_name(), self.day, self.year)
    }
}

/// Length of a 1-based month; 30 for anything out of range.
#[must_use]
pub const fn days_in_month(month: u8) -> u8 {
    if month >= 1 && month <= 12 {
        DAYS_PER_MONTH[(month - 1) as usize]
    } else {
        30
    }
}

#[must_use]
pub const fn month_name(month: u8) -> &'static str {
    if month >= 1 && month <= 12 {
        MONTH_NAMES[(month - 1) as usize]
    } else {
        "Unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_rolls_month_and_year() {
        assert_eq!(
            DateState::new(30, 4, 1848).advance_day(),
            DateState::new(1, 5, 1848)
        );
        assert_eq!(
            DateState::new(31, 12, 1848).advance_day(),
            DateState::new(1, 1, 1849)
        );
        assert_eq!(
            DateState::new(28, 2, 1848).advance_day(),
            DateState::new(1, 3, 1848)
        );
    }

    #[test]
    fn malformed_dates_roll_over() {
        assert_eq!(
            DateState::new(255, 4, 1848).advance_day(),
            DateState::new(1, 5, 1848)
        );
        assert_eq!(
            DateState::new(31, 255, 1848).advance_day(),
            DateState::new(1, 1, 1849)
        );
        assert_eq!(
            DateState::new(30, 0, 1848).advance_day(),
            DateState::new(1, 1, 1848)
        );
        assert_eq!(
            DateState::new(31, 12, u16::MAX).advance_day(),
            DateState::new(1, 1, u16::MAX)
        );
    }

    #[test]
    fn default_start_is_april_first() {
        let start = DateState::default();
        assert_eq!(start, DateState::new(1, 4, 1848));
        assert_eq!(start.to_string(), "April 1, 1848");
        assert_eq!(DateState::start_of(13), start);
        assert_eq!(start.advance_days(30), DateState::new(1, 5, 1848));
    }
}
