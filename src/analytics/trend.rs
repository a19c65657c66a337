use crate::analytics::first_of_month;
use crate::model::{Amount, Expense};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// The number of months in a trend series, including the current month.
pub const TREND_MONTHS: u32 = 6;

/// The total spent in one calendar month.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    /// e.g. `Oct 2026`
    pub month: String,
    pub amount: Amount,
}

/// Totals `expenses` for the month containing `today` and the five months before it.
///
/// The result always has one row per month, oldest first, with zero for months that have no
/// expenses. Expenses outside the window are ignored.
pub fn monthly_trends(expenses: &[Expense], today: NaiveDate) -> Vec<MonthlyTrend> {
    let current = first_of_month(today);
    let months: Vec<NaiveDate> = (0..TREND_MONTHS)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .collect();

    months
        .iter()
        .map(|month| MonthlyTrend {
            month: month.format("%b %Y").to_string(),
            amount: expenses
                .iter()
                .filter(|e| same_month(e.date, *month))
                .map(|e| e.amount)
                .sum(),
        })
        .collect()
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use chrono::Utc;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(on: NaiveDate, amount: &str) -> Expense {
        Expense::new(
            "id",
            "u1",
            Amount::from_str(amount).unwrap(),
            Category::Other,
            "thing",
            on,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_six_consecutive_months_ending_now() {
        let trends = monthly_trends(&[], date(2026, 3, 31));
        let labels: Vec<_> = trends.iter().map(|t| t.month.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Oct 2025", "Nov 2025", "Dec 2025", "Jan 2026", "Feb 2026", "Mar 2026"
            ]
        );
        assert!(trends.iter().all(|t| t.amount.is_zero()));
    }

    #[test]
    fn test_buckets_and_drops() {
        let today = date(2026, 10, 19);
        let expenses = vec![
            expense(date(2026, 10, 1), "10"),
            expense(date(2026, 10, 31), "5"),
            expense(date(2026, 5, 31), "7"),
            // outside the window
            expense(date(2026, 4, 30), "1000"),
            expense(date(2025, 10, 2), "1000"),
            expense(date(2026, 11, 1), "1000"),
        ];
        let trends = monthly_trends(&expenses, today);
        assert_eq!(trends.len(), 6);
        assert_eq!(trends[0].month, "May 2026");
        assert_eq!(trends[0].amount, Amount::from_str("7").unwrap());
        assert_eq!(trends[5].month, "Oct 2026");
        assert_eq!(trends[5].amount, Amount::from_str("15").unwrap());
        let total: Amount = trends.iter().map(|t| t.amount).sum();
        assert_eq!(total, Amount::from_str("22").unwrap());
    }
}
