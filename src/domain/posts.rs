//! Post-specific value types.

use std::fmt;

use time::{Date, Month, OffsetDateTime, Time};

use super::error::DomainError;

/// Half-open publication window `[start, end)` covering one calendar month in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthRange {
    year: i32,
    month: Month,
    start: OffsetDateTime,
    end: OffsetDateTime,
}

impl MonthRange {
    pub fn new(year: i32, month: u8) -> Result<Self, DomainError> {
        let month = Month::try_from(month).map_err(|_| {
            DomainError::validation(format!("month must be within 1-12, got {month}"))
        })?;

        let start = first_day(year, month)?;
        let (next_year, next_month) = match month {
            Month::December => (year.checked_add(1), Month::January),
            other => (Some(year), other.next()),
        };
        let next_year = next_year
            .ok_or_else(|| DomainError::validation(format!("year {year} is out of range")))?;
        let end = first_day(next_year, next_month)?;

        Ok(Self {
            year,
            month,
            start,
            end,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        u8::from(self.month)
    }

    /// Inclusive lower bound.
    pub fn start(&self) -> OffsetDateTime {
        self.start
    }

    /// Exclusive upper bound.
    pub fn end(&self) -> OffsetDateTime {
        self.end
    }

    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.start <= instant && instant < self.end
    }
}

impl fmt::Display for MonthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month())
    }
}

fn first_day(year: i32, month: Month) -> Result<OffsetDateTime, DomainError> {
    Date::from_calendar_date(year, month, 1)
        .map(|date| date.with_time(Time::MIDNIGHT).assume_utc())
        .map_err(|err| DomainError::validation(format!("invalid month start {year}-{month}: {err}")))
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn mid_year_month_spans_to_next_month() {
        let range = MonthRange::new(2024, 2).expect("valid month");
        assert_eq!(range.start(), datetime!(2024-02-01 0:00 UTC));
        assert_eq!(range.end(), datetime!(2024-03-01 0:00 UTC));
        assert_eq!(range.to_string(), "2024-02");
    }

    #[test]
    fn december_rolls_over_into_next_year() {
        let range = MonthRange::new(2023, 12).expect("valid month");
        assert_eq!(range.start(), datetime!(2023-12-01 0:00 UTC));
        assert_eq!(range.end(), datetime!(2024-01-01 0:00 UTC));
    }

    #[test]
    fn bounds_are_half_open() {
        let range = MonthRange::new(2023, 12).expect("valid month");
        assert!(range.contains(datetime!(2023-12-01 0:00 UTC)));
        assert!(range.contains(datetime!(2023-12-31 23:59:59 UTC)));
        assert!(!range.contains(datetime!(2024-01-01 0:00 UTC)));
        assert!(!range.contains(datetime!(2023-11-30 23:59:59 UTC)));
    }

    #[test]
    fn rejects_month_out_of_range() {
        for month in [0, 13, 255] {
            let err = MonthRange::new(2024, month).expect_err("month should be rejected");
            assert!(matches!(err, DomainError::Validation { .. }));
        }
    }

    #[test]
    fn rejects_unrepresentable_year() {
        let err = MonthRange::new(9999, 12).expect_err("end of range overflows");
        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(MonthRange::new(100_000, 1).is_err());
    }
}
