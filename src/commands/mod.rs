//! Command handlers for the expenses CLI.
//!
//! This module contains implementations for all CLI subcommands. Every command that changes data
//! finishes with `refresh`, which recomputes limit progress and records any budget alerts that are
//! due.

mod advise;
mod dashboard;
mod expense;
mod export;
mod init;
mod limit;
mod notifications;
mod profile;
mod scan;

use crate::analytics::limit_progress;
use crate::error::Res;
use crate::model::Notification;
use crate::notify;
use crate::store::Store;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info, warn};

pub use advise::advise;
pub use dashboard::dashboard;
pub use expense::{add_expense, delete_expense, search_expenses, update_expense};
pub use export::{export_csv, export_json};
pub use init::init;
pub use limit::{add_limit, delete_limit, list_limits, update_limit};
pub use notifications::{list_notifications, mark_all_read, mark_read};
pub use profile::{show_profile, update_profile};
pub use scan::{scan, ScanOutcome};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// The result of a command that changed a record.
#[derive(Debug, Clone, Serialize)]
pub struct Mutation<T>
where
    T: Serialize + Clone + Debug,
{
    /// The record after the change, or `None` if there was no record with the given id.
    pub record: Option<T>,

    /// Budget alerts raised by the change.
    pub alerts: Vec<Notification>,
}

/// The current instant and the user's calendar date.
pub(crate) fn clock() -> (DateTime<Utc>, NaiveDate) {
    (Utc::now(), Local::now().date_naive())
}

/// Reloads the user's expenses and limits, recomputes progress, and stores any budget alerts that
/// are due. Returns the alerts that were stored.
pub(crate) async fn refresh(
    store: &dyn Store,
    user_id: &str,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> Res<Vec<Notification>> {
    let expenses = store.expenses().get_all(user_id).await?;
    let limits = store.limits().get_all(user_id).await?;
    let progress = limit_progress(&expenses, &limits, today);
    let alerts = notify::apply(store.notifications(), user_id, &progress, now).await?;
    for alert in &alerts {
        warn!("{}", alert.message);
    }
    Ok(alerts)
}

/// Appends ` (N budget alert(s))` to a message when alerts were raised.
fn with_alerts(message: String, alerts: &[Notification]) -> String {
    match alerts.len() {
        0 => message,
        1 => format!("{message} (1 budget alert)"),
        n => format!("{message} ({n} budget alerts)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Category, Expense, Period, SpendingLimit};
    use crate::store::MemoryStore;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_refresh_is_idempotent_within_a_day() {
        let store = MemoryStore::new();
        let (now, today) = clock();
        store
            .limits()
            .add(
                SpendingLimit::new(
                    "l1",
                    "u1",
                    Category::Travel,
                    Amount::from_str("100").unwrap(),
                    Period::Monthly,
                    now,
                )
                .unwrap(),
            )
            .await
            .unwrap();
        store
            .expenses()
            .add(
                Expense::new(
                    "e1",
                    "u1",
                    Amount::from_str("150").unwrap(),
                    Category::Travel,
                    "Train",
                    today,
                    now,
                )
                .unwrap(),
            )
            .await
            .unwrap();

        let first = refresh(&store, "u1", now, today).await.unwrap();
        assert_eq!(first.len(), 1);
        assert!(first[0].message.contains("over budget for Travel"));

        let second = refresh(&store, "u1", now, today).await.unwrap();
        assert!(second.is_empty());
        assert_eq!(store.notifications().get_all("u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_without_limits() {
        let store = MemoryStore::new();
        let (now, today) = clock();
        assert!(refresh(&store, "u1", now, today).await.unwrap().is_empty());
    }

    #[test]
    fn test_out_message_and_alerts() {
        let out: Out<()> = "hello".into();
        assert_eq!(out.message(), "hello");
        assert!(out.structure().is_none());
        assert_eq!(with_alerts("Done".into(), &[]), "Done");
    }
}
