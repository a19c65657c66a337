//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::advice::AiSettings;
use crate::db::Db;
use crate::model::{Amount, Category, Expense, User};
use crate::store::Store;
use crate::Config;
use chrono::{DateTime, NaiveDate, Utc};
use std::str::FromStr;
use tempfile::TempDir;
use uuid::Uuid;

/// Test environment that sets up an expenses home directory with Config and database.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with Config and initialized database.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("expenses");
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            created_at: Utc::now(),
            monthly_budget: None,
        };
        let config = Config::create(&root, user, AiSettings::default())
            .await
            .unwrap();

        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a reference to the Config.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn user_id(&self) -> &str {
        &self.config.user().id
    }

    pub fn db(&self) -> &Db {
        self.config.db()
    }

    /// Inserts an expense directly into the database, bypassing notifications and refresh.
    pub async fn insert_expense(
        &self,
        amount: &str,
        category: Category,
        date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Expense {
        let expense = Expense::new(
            Uuid::new_v4().to_string(),
            self.user_id(),
            Amount::from_str(amount).unwrap(),
            category,
            format!("{category} purchase"),
            date,
            created_at,
        )
        .unwrap();
        self.db().expenses().add(expense).await.unwrap()
    }
}
