//! Derived views over a user's expenses and limits.
//!
//! Everything in this module is a pure function of its inputs. Nothing is cached or persisted: the
//! views are recomputed from the full expense history every time they are needed. Functions that
//! depend on the current date take it as an argument.

mod category;
mod progress;
mod summary;
mod trend;

use chrono::{Datelike, Months, NaiveDate};

pub use category::{category_totals, top_categories, CategoryTotal};
pub use progress::{limit_progress, LimitProgress};
pub use summary::{dashboard, spending_tips, DashboardSummary};
pub use trend::{monthly_trends, MonthlyTrend, TREND_MONTHS};

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DateRange {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl DateRange {
    /// The calendar month that contains `day`.
    pub fn month_of(day: NaiveDate) -> Self {
        let first = first_of_month(day);
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        Self { first, last }
    }

    /// The calendar month before the one that contains `day`.
    pub fn previous_month_of(day: NaiveDate) -> Self {
        let first = first_of_month(day);
        match first.pred_opt() {
            Some(last_day_of_previous) => Self::month_of(last_day_of_previous),
            None => Self { first, last: first },
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.first <= day && day <= self.last
    }
}

pub(crate) fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_of() {
        let range = DateRange::month_of(date(2024, 2, 14));
        assert_eq!(range.first, date(2024, 2, 1));
        assert_eq!(range.last, date(2024, 2, 29));
        assert!(range.contains(date(2024, 2, 1)));
        assert!(range.contains(date(2024, 2, 29)));
        assert!(!range.contains(date(2024, 3, 1)));
        assert!(!range.contains(date(2024, 1, 31)));
    }

    #[test]
    fn test_previous_month_of_crosses_year() {
        let range = DateRange::previous_month_of(date(2026, 1, 31));
        assert_eq!(range.first, date(2025, 12, 1));
        assert_eq!(range.last, date(2025, 12, 31));
    }
}
