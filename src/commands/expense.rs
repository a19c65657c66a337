//! Expense command handlers.

use crate::args::{AddExpenseArgs, IdArgs, SearchArgs, UpdateExpenseArgs};
use crate::commands::{clock, refresh, with_alerts, Mutation, Out};
use crate::error::{Error, ErrorType, IntoResult};
use crate::model::{Expense, Notification};
use crate::notify;
use crate::search::{search, SearchResult};
use crate::store::Store;
use crate::utils::generate_id;
use crate::{Config, Result};
use chrono::{DateTime, NaiveDate, Utc};

/// Records a new expense for the configured user.
///
/// A unique id is generated for the expense. A success notification is recorded, and then limit
/// progress is refreshed, which may raise budget alerts.
///
/// # Errors
/// - A validation error if the amount is negative or the description is blank. Nothing is
///   written in that case.
/// - A database error if the store fails.
pub async fn add_expense(config: &Config, args: &AddExpenseArgs) -> Result<Out<Mutation<Expense>>> {
    let (now, today) = clock();
    let user_id = &config.user().id;
    let expense = Expense::new(
        generate_id(),
        user_id,
        args.amount,
        args.category,
        &args.description,
        args.date.unwrap_or(today),
        now,
    )?
    .with_receipt_url(args.receipt_url.clone());

    let (expense, alerts) = record_expense(config, expense, now, today).await?;

    let message = with_alerts(
        format!(
            "Added expense {}: {} for {}",
            expense.id, expense.amount, expense.description
        ),
        &alerts,
    );
    Ok(Out::new(
        message,
        Mutation {
            record: Some(expense),
            alerts,
        },
    ))
}

/// Stores a validated expense, records its success notification, and refreshes limit progress.
/// Returns the stored expense and any budget alerts raised.
pub(super) async fn record_expense(
    config: &Config,
    expense: Expense,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> Result<(Expense, Vec<Notification>)> {
    let store = config.db();
    let expense = store
        .expenses()
        .add(expense)
        .await
        .pub_result(ErrorType::Database)?;
    store
        .notifications()
        .add(notify::expense_added(generate_id(), &expense, now))
        .await
        .pub_result(ErrorType::Database)?;
    let alerts = refresh(store, &config.user().id, now, today)
        .await
        .pub_result(ErrorType::Database)?;
    Ok((expense, alerts))
}

/// Changes the given fields of an expense. An unknown id is not an error; nothing changes.
///
/// # Errors
/// - A validation error if no field is given, or a given field is invalid.
/// - A database error if the store fails.
pub async fn update_expense(
    config: &Config,
    args: &UpdateExpenseArgs,
) -> Result<Out<Mutation<Expense>>> {
    let patch = args.patch();
    if patch.is_empty() {
        return Err(Error::validation("Nothing to update, pass at least one field"));
    }
    patch.validate()?;

    let (now, today) = clock();
    let store = config.db();
    let updated = store
        .expenses()
        .update(&args.id, &patch)
        .await
        .pub_result(ErrorType::Database)?;
    let alerts = refresh(store, &config.user().id, now, today)
        .await
        .pub_result(ErrorType::Database)?;

    let message = match &updated {
        Some(expense) => format!("Updated expense {}", expense.id),
        None => format!("No expense found with id '{}'", args.id),
    };
    Ok(Out::new(
        with_alerts(message, &alerts),
        Mutation {
            record: updated,
            alerts,
        },
    ))
}

/// Removes an expense. An unknown id is not an error.
pub async fn delete_expense(config: &Config, args: &IdArgs) -> Result<Out<Mutation<String>>> {
    let (now, today) = clock();
    let store = config.db();
    let deleted = store
        .expenses()
        .delete(args.id())
        .await
        .pub_result(ErrorType::Database)?;
    let alerts = refresh(store, &config.user().id, now, today)
        .await
        .pub_result(ErrorType::Database)?;

    let message = if deleted {
        format!("Deleted expense {}", args.id())
    } else {
        format!("No expense found with id '{}'", args.id())
    };
    Ok(Out::new(
        message,
        Mutation {
            record: deleted.then(|| args.id().to_string()),
            alerts,
        },
    ))
}

/// Lists the expenses that match `args`, newest first.
pub async fn search_expenses(config: &Config, args: &SearchArgs) -> Result<Out<SearchResult>> {
    let expenses = config
        .db()
        .expenses()
        .get_all(&config.user().id)
        .await
        .pub_result(ErrorType::Database)?;
    let result = search(&expenses, &args.query());

    let mut lines = vec![format!(
        "Found {} expense{} totaling {}",
        result.count,
        if result.count == 1 { "" } else { "s" },
        result.total
    )];
    lines.extend(result.expenses.iter().map(|e| {
        format!(
            "  {}  {:<18} {:>12}  {}  ({})",
            e.date,
            e.category.name(),
            e.amount.to_string(),
            e.description,
            e.id
        )
    }));
    Ok(Out::new(lines.join("\n"), result))
}
