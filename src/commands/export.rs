//! Export command handlers.

use crate::args::{ExportCsvArgs, ExportJsonArgs};
use crate::commands::{clock, Out};
use crate::error::{ErrorType, IntoResult};
use crate::export::{self as exporter, csv_file_name, json_file_name};
use crate::search::search;
use crate::store::Store;
use crate::utils;
use crate::{Config, Result};
use std::path::{Path, PathBuf};

/// Writes the user profile, every expense and a summary to a JSON file. Returns the path written.
///
/// # Errors
/// - A validation error if there are no expenses. No file is written.
/// - An io error if the file cannot be written.
pub async fn export_json(config: &Config, args: &ExportJsonArgs) -> Result<Out<PathBuf>> {
    let (now, today) = clock();
    let user = config.user();
    let expenses = config
        .db()
        .expenses()
        .get_all(&user.id)
        .await
        .pub_result(ErrorType::Database)?;
    let json = exporter::export_json(user, &expenses, now)?;
    let path = destination(args.out(), json_file_name(today));
    utils::write(&path, json).await.pub_result(ErrorType::Io)?;
    Ok(Out::new(
        format!(
            "Exported {} expenses to '{}'",
            expenses.len(),
            path.display()
        ),
        path,
    ))
}

/// Writes the expenses that match the filter to a CSV file, newest first. Returns the path
/// written.
///
/// # Errors
/// - A validation error if no expense matches. No file is written.
/// - An io error if the file cannot be written.
pub async fn export_csv(config: &Config, args: &ExportCsvArgs) -> Result<Out<PathBuf>> {
    let (_, today) = clock();
    let expenses = config
        .db()
        .expenses()
        .get_all(&config.user().id)
        .await
        .pub_result(ErrorType::Database)?;
    let found = search(&expenses, &args.filter().query());
    let csv = exporter::export_csv(&found.expenses)?;
    let path = destination(args.out(), csv_file_name(today));
    utils::write(&path, csv).await.pub_result(ErrorType::Io)?;
    Ok(Out::new(
        format!("Exported {} expenses to '{}'", found.count, path.display()),
        path,
    ))
}

fn destination(out: Option<&Path>, default_name: String) -> PathBuf {
    out.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(default_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::SearchArgs;
    use crate::model::Category;
    use crate::test::TestEnv;
    use chrono::{Local, Utc};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_export_nothing_fails_without_writing() {
        let env = TestEnv::new().await;
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.json");
        let err = export_json(env.config(), &ExportJsonArgs::new(Some(out.clone())))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_export_files() {
        let env = TestEnv::new().await;
        let today = Local::now().date_naive();
        env.insert_expense("12.5", Category::FoodDining, today, Utc::now())
            .await;
        env.insert_expense("99", Category::Travel, today, Utc::now())
            .await;
        let dir = TempDir::new().unwrap();

        let json_path = dir.path().join("data.json");
        export_json(env.config(), &ExportJsonArgs::new(Some(json_path.clone())))
            .await
            .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value["summary"]["totalExpenses"], 2);
        assert_eq!(value["user"]["email"], "test@example.com");

        let csv_path = dir.path().join("data.csv");
        let filter = SearchArgs {
            category: Some(Category::Travel),
            ..Default::default()
        };
        let out = export_csv(env.config(), &ExportCsvArgs::new(Some(csv_path.clone()), filter))
            .await
            .unwrap();
        assert!(out.message().starts_with("Exported 1 expenses"));
        let csv = std::fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with(",Travel,\"Travel purchase\",99.00"));
    }
}
