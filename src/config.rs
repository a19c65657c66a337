//! Configuration file handling.
//!
//! The configuration file is stored at `$EXPENSES_HOME/config.json` and contains the profile of the
//! user who owns the data directory and the settings for the advice provider. API keys are never
//! written to it.

use crate::advice::AiSettings;
use crate::db::Db;
use crate::error::Res;
use crate::model::User;
use crate::utils;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "expenses";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const EXPENSES_SQLITE: &str = "expenses.sqlite";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$EXPENSES_HOME` and from there it loads `$EXPENSES_HOME/config.json` and opens
/// `$EXPENSES_HOME/expenses.sqlite`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    db: Db,
    sqlite_path: PathBuf,
}

impl Config {
    /// Creates the data directory and:
    /// - Creates an initial `config.json` file holding `user` and `ai`
    /// - Creates and migrates the SQLite database
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/expenses`
    /// - `user` - The profile of the person who owns the data.
    /// - `ai` - Which advice provider to use.
    ///
    /// # Errors
    /// - Returns an error if the directory already holds a configuration.
    /// - Returns an error if any file operations fail.
    pub(crate) async fn create(dir: impl Into<PathBuf>, user: User, ai: AiSettings) -> Res<Self> {
        // Create the directory if it does not exist
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the expenses home directory")?;

        // Canonicalize the directory path
        let root = utils::canonicalize(&maybe_relative).await?;
        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            );
        }

        // Initialize the SQLite database
        let sqlite_path = root.join(EXPENSES_SQLITE);
        let db = Db::init(&sqlite_path)
            .await
            .context("Unable to create SQLite DB")?;

        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            user,
            ai,
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
            db,
            sqlite_path,
        })
    }

    /// This will
    /// - validate that the `expenses_home` exists and that the config file exists
    /// - load the config file
    /// - open the SQLite database, migrating it if needed
    /// - return the loaded configuration object
    pub async fn load(expenses_home: impl Into<PathBuf>) -> Res<Self> {
        let maybe_relative = expenses_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Expenses home is missing, run `expenses init` first")?;

        // Validate that the home directory exists.
        utils::read_dir(&root)
            .await
            .context("Expenses home is missing")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let sqlite_path = root.join(EXPENSES_SQLITE);
        let db = Db::load(&sqlite_path)
            .await
            .context("Unable to load SQLite DB")?;

        Ok(Self {
            root,
            config_path,
            config_file,
            db,
            sqlite_path,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub(crate) fn db(&self) -> &Db {
        &self.db
    }

    pub fn sqlite_path(&self) -> &Path {
        &self.sqlite_path
    }

    pub fn user(&self) -> &User {
        &self.config_file.user
    }

    pub fn ai(&self) -> &AiSettings {
        &self.config_file.ai
    }

    /// Replaces the stored profile and rewrites `config.json`. The in-memory profile only changes
    /// once the file is written.
    pub(crate) async fn save_user(&mut self, user: User) -> Res<()> {
        let config_file = ConfigFile {
            user,
            ..self.config_file.clone()
        };
        config_file.save(&self.config_path).await?;
        self.config_file = config_file;
        Ok(())
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "expenses",
///   "config_version": 1,
///   "user": {
///     "id": "0b7e4a52-5d0a-4a63-9d6e-1f2b3c4d5e6f",
///     "name": "Sam",
///     "email": "sam@example.com",
///     "created_at": "2026-10-19T12:00:00Z",
///     "monthly_budget": "2500.00"
///   },
///   "ai": {
///     "provider": "openrouter"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "expenses"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The owner of the data directory
    user: User,

    /// Advice provider settings
    #[serde(default)]
    ai: AiSettings,
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app.
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .context("Unable to load the config file")?;

        // Validate app_name
        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version <= CONFIG_VERSION,
            "Unsupported config_version {}, this program supports up to {}",
            config.config_version,
            CONFIG_VERSION
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
