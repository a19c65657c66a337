use crate::advice::AiSettings;
use crate::args::InitArgs;
use crate::commands::Out;
use crate::error::{Error, ErrorType, IntoResult};
use crate::model::{Amount, User};
use crate::utils::generate_id;
use crate::{Config, Result};
use anyhow::Context;
use chrono::Utc;
use std::path::Path;

/// Creates the data directory and:
/// - Creates an initial `config.json` file holding the user profile and advice settings
/// - Creates and migrates the SQLite database
///
/// # Arguments
/// - `expenses_home` - The directory that will be the root of data directory, e.g.
///   `$HOME/expenses`
/// - `args` - The user profile and advice settings.
///
/// # Errors
/// - Returns a validation error if the name or email is blank, or the budget is not positive.
/// - Returns an error if the directory is already initialized or any file operations fail.
pub async fn init(expenses_home: &Path, args: &InitArgs) -> Result<Out<User>> {
    let name = args.name().trim();
    let email = args.email().trim();
    validate_profile(name, email, args.monthly_budget())?;

    let user = User {
        id: generate_id(),
        name: name.to_string(),
        email: email.to_string(),
        created_at: Utc::now(),
        monthly_budget: args.monthly_budget(),
    };
    let ai = AiSettings {
        provider: args.provider(),
        model: args.model().map(str::to_string),
        base_url: args.base_url().map(str::to_string),
    };

    let config = Config::create(expenses_home, user, ai)
        .await
        .context("Unable to create the data directory and configs")
        .pub_result(ErrorType::Config)?;
    Ok(Out::new(
        format!(
            "Successfully created the expenses directory at '{}'",
            config.root().display()
        ),
        config.user().clone(),
    ))
}

/// Checks the profile fields shared by `init` and `profile update`. `name` and `email` are
/// expected to be trimmed already.
pub(super) fn validate_profile(name: &str, email: &str, budget: Option<Amount>) -> Result<()> {
    if name.is_empty() {
        return Err(Error::validation("Name is required"));
    }
    if email.is_empty() {
        return Err(Error::validation("Email is required"));
    }
    match budget {
        Some(budget) if !budget.is_positive() => Err(Error::validation(format!(
            "Monthly budget must be greater than 0, got {budget}"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_profile() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("expenses");
        let args = InitArgs::new("Sam", "sam@example.com")
            .with_monthly_budget(Amount::from_str("2500").unwrap());
        let out = init(&home, &args).await.unwrap();
        let user = out.structure().unwrap();
        assert_eq!(user.name, "Sam");
        assert_eq!(user.monthly_budget(), Amount::from_str("2500").unwrap());

        let config = Config::load(&home).await.unwrap();
        assert_eq!(config.user(), user);

        let err = init(&home, &args).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
    }

    #[tokio::test]
    async fn test_init_validates_before_writing() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("expenses");
        let err = init(&home, &InitArgs::new(" ", "sam@example.com"))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(!home.exists());

        let args =
            InitArgs::new("Sam", "sam@example.com").with_monthly_budget(Amount::ZERO);
        assert!(init(&home, &args).await.unwrap_err().is_validation());
    }
}
