//! Notifications: the budget alert policy, the read-state view, and the messages that user actions
//! produce.

mod inbox;
pub mod policy;

use crate::model::{Expense, Notification, NotificationType, SpendingLimit};
use chrono::{DateTime, Utc};

pub use inbox::{Inbox, ReadFilter};
pub use policy::{apply, evaluate, AlertDraft};

/// The notification recorded when an expense is added.
pub fn expense_added(id: impl Into<String>, expense: &Expense, now: DateTime<Utc>) -> Notification {
    Notification::new(
        id,
        &expense.user_id,
        format!(
            "New expense added: {} for {}",
            expense.amount, expense.description
        ),
        NotificationType::Success,
        now,
    )
}

/// The notification recorded when a spending limit is created.
pub fn limit_created(
    id: impl Into<String>,
    limit: &SpendingLimit,
    now: DateTime<Utc>,
) -> Notification {
    Notification::new(
        id,
        &limit.user_id,
        format!(
            "New {} spending limit set for {}: {}",
            limit.period, limit.category, limit.amount
        ),
        NotificationType::Info,
        now,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Category, Period};
    use chrono::NaiveDate;
    use std::str::FromStr;

    #[test]
    fn test_creation_messages() {
        let now = Utc::now();
        let expense = Expense::new(
            "e1",
            "u1",
            Amount::from_str("45.67").unwrap(),
            Category::FoodDining,
            "Grocery Store",
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            now,
        )
        .unwrap();
        let n = expense_added("n1", &expense, now);
        assert_eq!(n.message, "New expense added: $45.67 for Grocery Store");
        assert_eq!(n.notification_type, NotificationType::Success);
        assert!(n.alert.is_none());

        let limit = SpendingLimit::new(
            "l1",
            "u1",
            Category::Travel,
            Amount::from_str("300").unwrap(),
            Period::Weekly,
            now,
        )
        .unwrap();
        let n = limit_created("n2", &limit, now);
        assert_eq!(n.message, "New weekly spending limit set for Travel: $300.00");
        assert_eq!(n.notification_type, NotificationType::Info);
        assert_eq!(n.user_id, "u1");
    }
}
