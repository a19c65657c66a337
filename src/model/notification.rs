use crate::model::Category;
use crate::store::{Collection, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The severity of a notification.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Warning,
    Info,
    Success,
    Error,
}

serde_plain::derive_display_from_serialize!(NotificationType);
serde_plain::derive_fromstr_from_deserialize!(NotificationType);

/// The two kinds of budget alert.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Spending has exceeded the limit.
    OverBudget,
    /// Spending has passed 80% of the limit but not exceeded it.
    Approaching,
}

serde_plain::derive_display_from_serialize!(AlertKind);

impl AlertKind {
    /// The phrase that budget alert messages of this kind always contain. Notifications written
    /// before alerts carried an `AlertKey` are recognized by this phrase.
    pub fn phrase(&self) -> &'static str {
        match self {
            AlertKind::OverBudget => "over budget",
            AlertKind::Approaching => "approaching",
        }
    }

    pub fn notification_type(&self) -> NotificationType {
        match self {
            AlertKind::OverBudget => NotificationType::Warning,
            AlertKind::Approaching => NotificationType::Info,
        }
    }
}

/// Identifies which budget alert a notification represents.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct AlertKey {
    pub category: Category,
    pub kind: AlertKind,
}

impl AlertKey {
    pub fn new(category: Category, kind: AlertKind) -> Self {
        Self { category, kind }
    }
}

/// A message for the user. Notifications start unread and can only move to read.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<AlertKey>,
}

impl Notification {
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        message: impl Into<String>,
        notification_type: NotificationType,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            message: message.into(),
            notification_type,
            read: false,
            created_at,
            alert: None,
        }
    }

    pub fn with_alert(mut self, alert: AlertKey) -> Self {
        self.alert = Some(alert);
        self
    }

    /// Returns true if this notification is the budget alert identified by `key`.
    ///
    /// A notification with an `alert` matches on that key alone. One without (written by an older
    /// version) matches when it has the kind's type and its message contains both the category name
    /// and the kind's phrase.
    pub fn is_alert_for(&self, key: AlertKey) -> bool {
        match self.alert {
            Some(alert) => alert == key,
            None => {
                self.notification_type == key.kind.notification_type()
                    && self.message.contains(key.category.name())
                    && self.message.contains(key.kind.phrase())
            }
        }
    }
}

/// The only mutation a notification supports.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct MarkRead;

impl Record for Notification {
    type Patch = MarkRead;
    const COLLECTION: Collection = Collection::Notifications;

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn apply(&mut self, _: &MarkRead) {
        self.read = true;
    }
}
