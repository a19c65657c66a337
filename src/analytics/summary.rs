use crate::analytics::{
    category_totals, limit_progress, monthly_trends, top_categories, CategoryTotal, DateRange,
    LimitProgress, MonthlyTrend,
};
use crate::model::{Amount, Expense, Notification, SpendingLimit};
use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

const TOP_CATEGORIES: usize = 3;
const RECENT_EXPENSES: usize = 5;

/// Everything the dashboard shows, computed in one pass.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub today: NaiveDate,
    pub total_this_month: Amount,
    /// `total_this_month` divided by the day of the month.
    pub avg_daily: Amount,
    pub last_month_total: Amount,
    /// Percent change from last month to this month, or zero when last month had no spending.
    pub monthly_change_percent: Decimal,
    pub category_totals: Vec<CategoryTotal>,
    pub top_categories: Vec<CategoryTotal>,
    pub monthly_trends: Vec<MonthlyTrend>,
    pub limit_progress: Vec<LimitProgress>,
    pub recent_expenses: Vec<Expense>,
    pub unread_notifications: usize,
}

/// Computes the dashboard for one user.
pub fn dashboard(
    expenses: &[Expense],
    limits: &[SpendingLimit],
    notifications: &[Notification],
    today: NaiveDate,
) -> DashboardSummary {
    let total_this_month = total_in(expenses, DateRange::month_of(today));
    let last_month_total = total_in(expenses, DateRange::previous_month_of(today));

    let avg_daily = total_this_month
        .value()
        .checked_div(Decimal::from(today.day()))
        .map(|v| Amount::new(v).cents())
        .map(Amount::new)
        .unwrap_or_default();

    let monthly_change_percent = if last_month_total.is_positive() {
        (total_this_month - last_month_total)
            .value()
            .checked_div(last_month_total.value())
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map(|pct| pct.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
            .unwrap_or_default()
    } else {
        Decimal::ZERO
    };

    let totals = category_totals(expenses);

    let mut recent_expenses = expenses.to_vec();
    recent_expenses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent_expenses.truncate(RECENT_EXPENSES);

    DashboardSummary {
        today,
        total_this_month,
        avg_daily,
        last_month_total,
        monthly_change_percent,
        top_categories: top_categories(&totals, TOP_CATEGORIES),
        category_totals: totals,
        monthly_trends: monthly_trends(expenses, today),
        limit_progress: limit_progress(expenses, limits, today),
        recent_expenses,
        unread_notifications: notifications.iter().filter(|n| !n.read).count(),
    }
}

fn total_in(expenses: &[Expense], range: DateRange) -> Amount {
    expenses
        .iter()
        .filter(|e| range.contains(e.date))
        .map(|e| e.amount)
        .sum()
}

/// General advice shown alongside the dashboard.
pub fn spending_tips() -> &'static [&'static str] {
    &[
        "Consider setting a weekly budget for dining out to control food expenses.",
        "Track your subscriptions - they can add up quickly over time.",
        "Use the 24-hour rule before making non-essential purchases.",
    ]
}
