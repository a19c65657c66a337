use crate::analytics::DateRange;
use crate::model::{Amount, Category, Expense, Period, SpendingLimit};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How far this month's spending has gone against one limit.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LimitProgress {
    pub limit_id: String,
    pub category: Category,
    pub period: Period,
    pub spent: Amount,
    pub limit: Amount,
    /// `spent / limit * 100`, clamped to `0..=100`.
    pub percentage: Decimal,
    /// `limit - spent`, or zero once the limit is used up.
    pub remaining: Amount,
    /// True when `spent` exceeds `limit`. Not clamped.
    pub is_over_budget: bool,
}

impl LimitProgress {
    /// How much spending has gone past the limit, or zero.
    pub fn overage(&self) -> Amount {
        if self.is_over_budget {
            self.spent - self.limit
        } else {
            Amount::ZERO
        }
    }
}

/// Computes one progress row per limit from the expenses dated in the month containing `today`.
///
/// Weekly limits are measured against month-to-date spending just like monthly ones. Duplicate
/// limits each get their own row. A limit that is not positive (which validation normally prevents)
/// is reported as fully used and over budget.
pub fn limit_progress(
    expenses: &[Expense],
    limits: &[SpendingLimit],
    today: NaiveDate,
) -> Vec<LimitProgress> {
    let month = DateRange::month_of(today);
    let this_month: Vec<&Expense> = expenses.iter().filter(|e| month.contains(e.date)).collect();
    limits
        .iter()
        .map(|limit| {
            let spent: Amount = this_month
                .iter()
                .filter(|e| e.category == limit.category)
                .map(|e| e.amount)
                .sum();
            progress(limit, spent)
        })
        .collect()
}

fn progress(limit: &SpendingLimit, spent: Amount) -> LimitProgress {
    let hundred = Decimal::ONE_HUNDRED;
    let (percentage, remaining, is_over_budget) = if limit.amount.is_positive() {
        let percentage = spent
            .value()
            .checked_div(limit.amount.value())
            .and_then(|ratio| ratio.checked_mul(hundred))
            .unwrap_or(hundred)
            .clamp(Decimal::ZERO, hundred);
        let remaining = (limit.amount - spent).max(Amount::ZERO);
        (percentage, remaining, spent > limit.amount)
    } else {
        (hundred, Amount::ZERO, true)
    };
    LimitProgress {
        limit_id: limit.id.clone(),
        category: limit.category,
        period: limit.period,
        spent,
        limit: limit.amount,
        percentage,
        remaining,
        is_over_budget,
    }
}
