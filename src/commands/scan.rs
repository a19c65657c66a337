use crate::args::ScanArgs;
use crate::commands::expense::record_expense;
use crate::commands::{clock, with_alerts, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{Expense, Notification};
use crate::ocr::{ReceiptDraft, ReceiptScanner};
use crate::utils::{self, generate_id};
use crate::{Config, Result};
use serde::Serialize;

/// What `scan` read, and the expense it recorded when asked to save.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub draft: ReceiptDraft,
    pub expense: Option<Expense>,
    pub alerts: Vec<Notification>,
}

/// Reads a receipt image with `scanner`. When `--save` is given the draft is recorded as an
/// expense, described by the vendor, exactly as `expense add` would record it.
///
/// # Errors
/// - An io error if the image cannot be read.
/// - A collaborator error if the scanner rejects the image or fails. Nothing is recorded.
pub async fn scan(
    config: &Config,
    scanner: &dyn ReceiptScanner,
    args: &ScanArgs,
) -> Result<Out<ScanOutcome>> {
    let (now, today) = clock();
    let image = utils::read_bytes(args.image())
        .await
        .pub_result(ErrorType::Io)?;
    let draft = scanner
        .scan(&image, today)
        .await
        .pub_result(ErrorType::Collaborator)?;

    let mut message = format!(
        "Scanned {}: {} on {} ({}, {}% confidence)",
        draft.vendor,
        draft.amount,
        draft.date,
        draft.category,
        draft.confidence_percent()
    );
    if !args.save() {
        return Ok(Out::new(
            message,
            ScanOutcome {
                draft,
                expense: None,
                alerts: Vec::new(),
            },
        ));
    }

    let expense = Expense::new(
        generate_id(),
        &config.user().id,
        draft.amount,
        draft.category,
        &draft.vendor,
        draft.date,
        now,
    )?;
    let (expense, alerts) = record_expense(config, expense, now, today).await?;

    message = with_alerts(format!("{message}. Saved as expense {}", expense.id), &alerts);
    Ok(Out::new(
        message,
        ScanOutcome {
            draft,
            expense: Some(expense),
            alerts,
        },
    ))
}
