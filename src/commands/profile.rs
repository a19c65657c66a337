//! Profile command handlers.

use crate::args::UpdateProfileArgs;
use crate::commands::init::validate_profile;
use crate::commands::Out;
use crate::error::{Error, ErrorType, IntoResult};
use crate::model::User;
use crate::{Config, Result};

/// Shows the configured user's profile.
pub fn show_profile(config: &Config) -> Result<Out<User>> {
    let user = config.user();
    let message = format!(
        "{} <{}>, monthly budget {}{}",
        user.name,
        user.email,
        user.monthly_budget(),
        if user.monthly_budget.is_none() {
            " (default)"
        } else {
            ""
        }
    );
    Ok(Out::new(message, user.clone()))
}

/// Changes the given profile fields and saves them to `config.json`. The monthly budget is what
/// the dashboard and advice compare spending against.
///
/// # Errors
/// - A validation error if no field is given, the name or email is blank, or the budget is not
///   positive. Nothing is written in that case.
/// - A config error if the file cannot be written.
pub async fn update_profile(
    config: &mut Config,
    args: &UpdateProfileArgs,
) -> Result<Out<User>> {
    if args.is_empty() {
        return Err(Error::validation("Nothing to update, pass at least one field"));
    }

    let mut user = config.user().clone();
    if let Some(name) = &args.name {
        user.name = name.trim().to_string();
    }
    if let Some(email) = &args.email {
        user.email = email.trim().to_string();
    }
    if let Some(budget) = args.monthly_budget {
        user.monthly_budget = Some(budget);
    }
    validate_profile(&user.name, &user.email, user.monthly_budget)?;

    config
        .save_user(user.clone())
        .await
        .pub_result(ErrorType::Config)?;
    Ok(Out::new(format!("Updated the profile of {}", user.name), user))
}
