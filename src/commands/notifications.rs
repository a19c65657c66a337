//! Notification command handlers.

use crate::args::{IdArgs, ListNotificationsArgs};
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::notify::Inbox;
use crate::store::Store;
use crate::{Config, Result};

/// Lists the user's notifications, newest first, filtered by read state.
pub async fn list_notifications(
    config: &Config,
    args: &ListNotificationsArgs,
) -> Result<Out<Inbox>> {
    let all = config
        .db()
        .notifications()
        .get_all(&config.user().id)
        .await
        .pub_result(ErrorType::Database)?;
    let inbox = Inbox::new(all, args.filter());

    let mut lines = vec![format!(
        "{} unread of {} notifications",
        inbox.unread, inbox.total
    )];
    lines.extend(inbox.notifications.iter().map(|n| {
        format!(
            "  {} {:<7} {} {}  ({})",
            if n.read { " " } else { "*" },
            n.notification_type.to_string(),
            n.created_at.format("%Y-%m-%d %H:%M"),
            n.message,
            n.id
        )
    }));
    Ok(Out::new(lines.join("\n"), inbox))
}

/// Marks one notification as read. An unknown id is not an error.
pub async fn mark_read(config: &Config, args: &IdArgs) -> Result<Out<bool>> {
    let found = config
        .db()
        .notifications()
        .mark_as_read(args.id())
        .await
        .pub_result(ErrorType::Database)?;
    let message = if found {
        format!("Marked notification {} as read", args.id())
    } else {
        format!("No notification found with id '{}'", args.id())
    };
    Ok(Out::new(message, found))
}

/// Marks every unread notification of the user as read.
pub async fn mark_all_read(config: &Config) -> Result<Out<usize>> {
    let count = config
        .db()
        .notifications()
        .mark_all_as_read(&config.user().id)
        .await
        .pub_result(ErrorType::Database)?;
    let message = format!(
        "Marked {} notification{} as read",
        count,
        if count == 1 { "" } else { "s" }
    );
    Ok(Out::new(message, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Notification, NotificationType};
    use crate::notify::ReadFilter;
    use crate::test::TestEnv;
    use chrono::{Duration, Utc};

    async fn seed(env: &TestEnv) {
        let now = Utc::now();
        for (i, message) in ["first", "second", "third"].iter().enumerate() {
            let n = Notification::new(
                format!("n{i}"),
                env.user_id(),
                *message,
                NotificationType::Info,
                now + Duration::seconds(i64::try_from(i).unwrap()),
            );
            env.db().notifications().add(n).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_read_state_transitions() {
        let env = TestEnv::new().await;
        seed(&env).await;

        let out = list_notifications(env.config(), &ListNotificationsArgs::default())
            .await
            .unwrap();
        let inbox = out.structure().unwrap();
        assert_eq!(inbox.unread, 3);
        let messages: Vec<&str> = inbox.notifications.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["third", "second", "first"]);

        let out = mark_read(env.config(), &IdArgs::new("n1")).await.unwrap();
        assert_eq!(out.structure(), Some(&true));
        let out = mark_read(env.config(), &IdArgs::new("nope")).await.unwrap();
        assert_eq!(out.structure(), Some(&false));

        let out = list_notifications(env.config(), &ListNotificationsArgs::new(ReadFilter::Read))
            .await
            .unwrap();
        let inbox = out.structure().unwrap();
        assert_eq!(inbox.notifications.len(), 1);
        assert_eq!(inbox.notifications[0].id, "n1");
        assert_eq!(inbox.unread, 2);

        let out = mark_all_read(env.config()).await.unwrap();
        assert_eq!(out.structure(), Some(&2));
        let out = mark_all_read(env.config()).await.unwrap();
        assert_eq!(out.structure(), Some(&0));

        let out =
            list_notifications(env.config(), &ListNotificationsArgs::new(ReadFilter::Unread))
                .await
                .unwrap();
        assert!(out.structure().unwrap().notifications.is_empty());
    }
}
