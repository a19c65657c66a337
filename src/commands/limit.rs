//! Spending limit command handlers.

use crate::analytics::{limit_progress, LimitProgress};
use crate::args::{AddLimitArgs, IdArgs, UpdateLimitArgs};
use crate::commands::{clock, refresh, with_alerts, Mutation, Out};
use crate::error::{Error, ErrorType, IntoResult};
use crate::model::{LimitPatch, SpendingLimit};
use crate::notify;
use crate::store::{Record, Store};
use crate::utils::generate_id;
use crate::{Config, Result};
use rust_decimal::RoundingStrategy;

/// Sets a spending limit. Only one limit may exist for each (category, period).
///
/// An info notification is recorded, and then limit progress is refreshed. A new limit that is
/// already exceeded raises its alert right away.
///
/// # Errors
/// - A validation error if the amount is not positive or the (category, period) is taken.
/// - A database error if the store fails.
pub async fn add_limit(
    config: &Config,
    args: &AddLimitArgs,
) -> Result<Out<Mutation<SpendingLimit>>> {
    let (now, today) = clock();
    let user_id = &config.user().id;
    let limit = SpendingLimit::new(
        generate_id(),
        user_id,
        args.category,
        args.amount,
        args.period,
        now,
    )?;

    let store = config.db();
    let existing = store
        .limits()
        .get_all(user_id)
        .await
        .pub_result(ErrorType::Database)?;
    ensure_unique(&limit, &existing)?;

    let limit = store
        .limits()
        .add(limit)
        .await
        .pub_result(ErrorType::Database)?;
    store
        .notifications()
        .add(notify::limit_created(generate_id(), &limit, now))
        .await
        .pub_result(ErrorType::Database)?;
    let alerts = refresh(store, user_id, now, today)
        .await
        .pub_result(ErrorType::Database)?;

    let message = with_alerts(
        format!(
            "Set a {} limit of {} for {} ({})",
            limit.period, limit.amount, limit.category, limit.id
        ),
        &alerts,
    );
    Ok(Out::new(
        message,
        Mutation {
            record: Some(limit),
            alerts,
        },
    ))
}

/// Changes the given fields of a limit. An unknown id is not an error; nothing changes.
///
/// # Errors
/// - A validation error if no field is given, the amount is not positive, or the change would
///   create a second limit for the same (category, period).
/// - A database error if the store fails.
pub async fn update_limit(
    config: &Config,
    args: &UpdateLimitArgs,
) -> Result<Out<Mutation<SpendingLimit>>> {
    let patch: LimitPatch = args.patch();
    if patch == LimitPatch::default() {
        return Err(Error::validation("Nothing to update, pass at least one field"));
    }
    patch.validate()?;

    let (now, today) = clock();
    let user_id = &config.user().id;
    let store = config.db();
    let existing = store
        .limits()
        .get_all(user_id)
        .await
        .pub_result(ErrorType::Database)?;
    if let Some(current) = existing.iter().find(|l| l.id == args.id) {
        let mut candidate = current.clone();
        candidate.apply(&patch);
        ensure_unique(&candidate, &existing)?;
    }

    let updated = store
        .limits()
        .update(&args.id, &patch)
        .await
        .pub_result(ErrorType::Database)?;
    let alerts = refresh(store, user_id, now, today)
        .await
        .pub_result(ErrorType::Database)?;

    let message = match &updated {
        Some(limit) => format!(
            "Updated the {} limit for {}: {}",
            limit.period, limit.category, limit.amount
        ),
        None => format!("No limit found with id '{}'", args.id),
    };
    Ok(Out::new(
        with_alerts(message, &alerts),
        Mutation {
            record: updated,
            alerts,
        },
    ))
}

/// Removes a limit. An unknown id is not an error.
pub async fn delete_limit(config: &Config, args: &IdArgs) -> Result<Out<Mutation<String>>> {
    let (now, today) = clock();
    let store = config.db();
    let deleted = store
        .limits()
        .delete(args.id())
        .await
        .pub_result(ErrorType::Database)?;
    let alerts = refresh(store, &config.user().id, now, today)
        .await
        .pub_result(ErrorType::Database)?;

    let message = if deleted {
        format!("Deleted limit {}", args.id())
    } else {
        format!("No limit found with id '{}'", args.id())
    };
    Ok(Out::new(
        message,
        Mutation {
            record: deleted.then(|| args.id().to_string()),
            alerts,
        },
    ))
}

/// Lists every limit with this month's progress.
pub async fn list_limits(config: &Config) -> Result<Out<Vec<LimitProgress>>> {
    let (_, today) = clock();
    let user_id = &config.user().id;
    let store = config.db();
    let expenses = store
        .expenses()
        .get_all(user_id)
        .await
        .pub_result(ErrorType::Database)?;
    let limits = store
        .limits()
        .get_all(user_id)
        .await
        .pub_result(ErrorType::Database)?;
    let progress = limit_progress(&expenses, &limits, today);

    let mut lines = vec![match progress.len() {
        0 => "No spending limits set".to_string(),
        1 => "1 spending limit".to_string(),
        n => format!("{n} spending limits"),
    }];
    lines.extend(progress.iter().map(|row| {
        let standing = if row.is_over_budget {
            format!("over by {}", row.overage())
        } else {
            format!("{} remaining", row.remaining)
        };
        format!(
            "  {} ({}): {} of {}, {}% used, {standing}  ({})",
            row.category,
            row.period,
            row.spent,
            row.limit,
            row.percentage
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
            row.limit_id
        )
    }));
    Ok(Out::new(lines.join("\n"), progress))
}

fn ensure_unique(limit: &SpendingLimit, existing: &[SpendingLimit]) -> Result<()> {
    if existing.iter().any(|other| limit.conflicts_with(other)) {
        return Err(Error::validation(format!(
            "A {} limit for {} already exists",
            limit.period, limit.category
        )));
    }
    Ok(())
}
