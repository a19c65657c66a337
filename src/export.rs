//! Exporting a user's data as a JSON bundle or a CSV spreadsheet.

use crate::error::{Error, Res, Result};
use crate::model::{Amount, Expense, User};
use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Everything that `export_json` writes.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub user: User,
    pub expenses: Vec<Expense>,
    pub export_date: DateTime<Utc>,
    pub summary: ExportSummary,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub total_expenses: usize,
    pub total_amount: Amount,
    pub average_per_expense: Amount,
}

impl ExportSummary {
    fn new(expenses: &[Expense]) -> Self {
        let total_amount: Amount = expenses.iter().map(|e| e.amount).sum();
        let average = match expenses.len() {
            0 => Decimal::ZERO,
            n => total_amount.value() / Decimal::from(n),
        };
        Self {
            total_expenses: expenses.len(),
            total_amount,
            average_per_expense: Amount::new(average).cents().into(),
        }
    }
}

/// The default file name for a JSON export made on `today`.
pub fn json_file_name(today: NaiveDate) -> String {
    format!("expense_data_{}.json", today.format("%Y-%m-%d"))
}

/// The default file name for a CSV export made on `today`.
pub fn csv_file_name(today: NaiveDate) -> String {
    format!("expenses_{}.csv", today.format("%Y-%m-%d"))
}

/// Builds the JSON export bundle for `user`. Fails when there are no expenses.
pub fn export_bundle(user: &User, expenses: &[Expense], now: DateTime<Utc>) -> Result<ExportBundle> {
    if expenses.is_empty() {
        return Err(Error::validation("No data to export"));
    }
    Ok(ExportBundle {
        user: user.clone(),
        expenses: expenses.to_vec(),
        export_date: now,
        summary: ExportSummary::new(expenses),
    })
}

/// Serializes the export bundle as pretty JSON.
pub fn export_json(user: &User, expenses: &[Expense], now: DateTime<Utc>) -> Result<String> {
    let bundle = export_bundle(user, expenses, now)?;
    Ok(serde_json::to_string_pretty(&bundle).context("Unable to serialize the export")?)
}

/// Writes `expenses` as CSV with the header `Date,Category,Description,Amount`. The description
/// is always quoted. Fails when there are no expenses.
pub fn export_csv(expenses: &[Expense]) -> Result<String> {
    if expenses.is_empty() {
        return Err(Error::validation("No expenses to export"));
    }
    Ok(write_csv(expenses)?)
}

fn write_csv(expenses: &[Expense]) -> Res<String> {
    // Quoting is done by hand so that only the description is quoted.
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new());
    writer
        .write_record(["Date", "Category", "Description", "Amount"])
        .context("Unable to write the CSV header")?;
    for expense in expenses {
        let date = expense.date.format("%Y-%m-%d").to_string();
        let description = format!("\"{}\"", expense.description.replace('"', "\"\""));
        writer
            .write_record([
                date.as_str(),
                expense.category.name(),
                description.as_str(),
                expense.amount.plain().as_str(),
            ])
            .with_context(|| format!("Unable to write expense {} as CSV", expense.id))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Unable to flush the CSV writer: {}", e.error()))?;
    String::from_utf8(bytes).context("The CSV output was not UTF-8")
}
