use crate::model::Notification;
use serde::{Deserialize, Serialize};

/// Which notifications to list.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ReadFilter {
    #[default]
    All,
    Unread,
    Read,
}

serde_plain::derive_display_from_serialize!(ReadFilter);
serde_plain::derive_fromstr_from_deserialize!(ReadFilter);

impl ReadFilter {
    pub fn accepts(&self, notification: &Notification) -> bool {
        match self {
            ReadFilter::All => true,
            ReadFilter::Unread => !notification.read,
            ReadFilter::Read => notification.read,
        }
    }
}

/// A filtered view of a user's notifications, newest first.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Inbox {
    pub filter: ReadFilter,
    pub notifications: Vec<Notification>,
    /// Unread notifications in total, regardless of `filter`.
    pub unread: usize,
    /// All notifications in total, regardless of `filter`.
    pub total: usize,
}

impl Inbox {
    /// Builds the view from `all`, which must already be newest first.
    pub fn new(all: Vec<Notification>, filter: ReadFilter) -> Self {
        let unread = all.iter().filter(|n| !n.read).count();
        let total = all.len();
        let notifications = all.into_iter().filter(|n| filter.accepts(n)).collect();
        Self {
            filter,
            notifications,
            unread,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NotificationType;
    use chrono::Utc;

    fn notification(id: &str, read: bool) -> Notification {
        let mut n = Notification::new(id, "u1", "m", NotificationType::Info, Utc::now());
        n.read = read;
        n
    }

    #[test]
    fn test_filters_and_counts() {
        let all = vec![
            notification("c", false),
            notification("b", true),
            notification("a", false),
        ];
        let unread = Inbox::new(all.clone(), ReadFilter::Unread);
        assert_eq!(unread.unread, 2);
        assert_eq!(unread.total, 3);
        let ids: Vec<_> = unread.notifications.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);

        let read = Inbox::new(all.clone(), ReadFilter::Read);
        assert_eq!(read.notifications.len(), 1);
        assert_eq!(Inbox::new(all, ReadFilter::All).notifications.len(), 3);
    }
}
