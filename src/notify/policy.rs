//! Decides when budget alerts are raised.
//!
//! For each progress row, an over-budget row raises an over-budget warning. Otherwise a row past
//! 80% raises an approaching info message. Neither is raised if the user already got the same
//! alert, for the same category, within the last 24 hours. Only notification history is consulted,
//! so dismissing or reading an alert does not cause it to be raised again early.

use crate::analytics::LimitProgress;
use crate::error::Res;
use crate::model::{AlertKey, AlertKind, Notification, NotificationType};
use crate::store::NotificationStore;
use crate::utils::generate_id;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::debug;

/// Percentages strictly above this raise an approaching alert.
pub const APPROACHING_THRESHOLD: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

/// How long an alert suppresses a repeat of itself.
pub fn dedup_window() -> Duration {
    Duration::hours(24)
}

/// An alert that should be sent but has not been stored yet.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct AlertDraft {
    pub key: AlertKey,
    pub message: String,
}

impl AlertDraft {
    pub fn notification_type(&self) -> NotificationType {
        self.key.kind.notification_type()
    }

    pub fn into_notification(
        self,
        id: impl Into<String>,
        user_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Notification {
        let notification_type = self.notification_type();
        Notification::new(id, user_id, self.message, notification_type, now).with_alert(self.key)
    }
}

/// Returns the alerts that `progress` calls for, given the user's notification `history`.
///
/// At most one draft is returned per (category, kind), even when several limits cover the same
/// category.
pub fn evaluate(
    progress: &[LimitProgress],
    history: &[Notification],
    now: DateTime<Utc>,
) -> Vec<AlertDraft> {
    let since = now - dedup_window();
    let mut drafts: Vec<AlertDraft> = Vec::new();
    for row in progress {
        let Some(kind) = alert_kind(row) else {
            continue;
        };
        let key = AlertKey::new(row.category, kind);
        if drafts.iter().any(|d| d.key == key) {
            continue;
        }
        let recent = history
            .iter()
            .any(|n| n.created_at > since && n.is_alert_for(key));
        if recent {
            debug!("Suppressing {kind} alert for {}, sent recently", row.category);
            continue;
        }
        drafts.push(AlertDraft {
            key,
            message: message(row, kind),
        });
    }
    drafts
}

/// Evaluates `progress` against the stored history of `user_id` and stores the resulting alerts.
/// Returns the notifications that were added.
pub async fn apply(
    store: &dyn NotificationStore,
    user_id: &str,
    progress: &[LimitProgress],
    now: DateTime<Utc>,
) -> Res<Vec<Notification>> {
    let history = store.get_all(user_id).await?;
    let mut added = Vec::new();
    for draft in evaluate(progress, &history, now) {
        let notification = draft.into_notification(generate_id(), user_id, now);
        added.push(store.add(notification).await?);
    }
    Ok(added)
}

fn alert_kind(row: &LimitProgress) -> Option<AlertKind> {
    if row.is_over_budget {
        Some(AlertKind::OverBudget)
    } else if row.percentage > APPROACHING_THRESHOLD {
        Some(AlertKind::Approaching)
    } else {
        None
    }
}

fn message(row: &LimitProgress, kind: AlertKind) -> String {
    match kind {
        AlertKind::OverBudget => format!(
            "⚠️ You're over budget for {}! Spent {} of {} limit.",
            row.category, row.spent, row.limit
        ),
        AlertKind::Approaching => format!(
            "📊 You're approaching your {} limit. {}% used ({} remaining).",
            row.category,
            row.percentage
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
            row.remaining
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::limit_progress;
    use crate::model::{Amount, Category, Expense, Period, SpendingLimit};
    use crate::store::{MemoryStore, Store};
    use chrono::{NaiveDate, TimeZone};
    use std::str::FromStr;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn today() -> NaiveDate {
        now().date_naive()
    }

    fn progress(category: Category, spent: &str, limit: &str) -> Vec<LimitProgress> {
        let expense = Expense::new(
            "e",
            "u1",
            Amount::from_str(spent).unwrap(),
            category,
            "x",
            today(),
            now(),
        )
        .unwrap();
        let limit = SpendingLimit::new(
            "l",
            "u1",
            category,
            Amount::from_str(limit).unwrap(),
            Period::Monthly,
            now(),
        )
        .unwrap();
        limit_progress(&[expense], &[limit], today())
    }

    fn sent(kind: AlertKind, category: Category, hours_ago: i64) -> Notification {
        AlertDraft {
            key: AlertKey::new(category, kind),
            message: String::from("earlier"),
        }
        .into_notification("old", "u1", now() - Duration::hours(hours_ago))
    }

    #[test]
    fn test_over_budget_raises_warning() {
        let drafts = evaluate(&progress(Category::Travel, "150", "100"), &[], now());
        assert_eq!(drafts.len(), 1);
        let draft = &drafts[0];
        assert_eq!(draft.notification_type(), NotificationType::Warning);
        assert_eq!(
            draft.message,
            "⚠️ You're over budget for Travel! Spent $150.00 of $100.00 limit."
        );
        assert!(draft.message.contains("over budget"));
    }

    #[test]
    fn test_approaching_raises_info() {
        let drafts = evaluate(&progress(Category::FoodDining, "85", "100"), &[], now());
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].notification_type(), NotificationType::Info);
        assert_eq!(
            drafts[0].message,
            "📊 You're approaching your Food & Dining limit. 85% used ($15.00 remaining)."
        );
    }

    #[test]
    fn test_at_threshold_raises_nothing() {
        assert!(evaluate(&progress(Category::Travel, "80", "100"), &[], now()).is_empty());
        assert!(evaluate(&progress(Category::Travel, "100", "100"), &[], now())
            .first()
            .is_some_and(|d| d.key.kind == AlertKind::Approaching));
    }

    #[test]
    fn test_recent_alert_suppresses() {
        let history = vec![sent(AlertKind::OverBudget, Category::Travel, 1)];
        assert!(evaluate(&progress(Category::Travel, "150", "100"), &history, now()).is_empty());
    }

    #[test]
    fn test_old_alert_does_not_suppress() {
        let history = vec![sent(AlertKind::OverBudget, Category::Travel, 25)];
        assert_eq!(
            evaluate(&progress(Category::Travel, "150", "100"), &history, now()).len(),
            1
        );
    }

    #[test]
    fn test_exactly_24_hours_does_not_suppress() {
        let history = vec![sent(AlertKind::OverBudget, Category::Travel, 24)];
        assert_eq!(
            evaluate(&progress(Category::Travel, "150", "100"), &history, now()).len(),
            1
        );
    }

    #[test]
    fn test_other_kind_or_category_does_not_suppress() {
        let history = vec![
            sent(AlertKind::Approaching, Category::Travel, 1),
            sent(AlertKind::OverBudget, Category::Shopping, 1),
        ];
        assert_eq!(
            evaluate(&progress(Category::Travel, "150", "100"), &history, now()).len(),
            1
        );
    }

    #[test]
    fn test_legacy_message_suppresses() {
        let legacy = Notification::new(
            "old",
            "u1",
            "⚠️ You're over budget for Travel! Spent $150.00 of $100.00 limit.",
            NotificationType::Warning,
            now() - Duration::hours(2),
        );
        assert!(evaluate(&progress(Category::Travel, "150", "100"), &[legacy], now()).is_empty());
    }

    #[test]
    fn test_one_alert_per_category_and_kind() {
        let mut rows = progress(Category::Travel, "150", "100");
        rows.extend(progress(Category::Travel, "150", "120"));
        assert_eq!(evaluate(&rows, &[], now()).len(), 1);
    }

    #[test]
    fn test_no_limits_no_alerts() {
        assert!(evaluate(&[], &[], now()).is_empty());
    }

    #[tokio::test]
    async fn test_apply_is_idempotent_within_window() {
        let store = MemoryStore::new();
        let rows = progress(Category::Travel, "150", "100");

        let added = apply(store.notifications(), "u1", &rows, now())
            .await
            .unwrap();
        assert_eq!(added.len(), 1);
        assert_eq!(
            added[0].alert,
            Some(AlertKey::new(Category::Travel, AlertKind::OverBudget))
        );

        let again = apply(store.notifications(), "u1", &rows, now() + Duration::hours(3))
            .await
            .unwrap();
        assert!(again.is_empty());
        assert_eq!(store.notifications().get_all("u1").await.unwrap().len(), 1);

        let later = apply(store.notifications(), "u1", &rows, now() + Duration::hours(25))
            .await
            .unwrap();
        assert_eq!(later.len(), 1);
    }
}
