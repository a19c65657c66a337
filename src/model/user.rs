use crate::model::Amount;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The monthly budget used when the profile does not set one.
pub const DEFAULT_MONTHLY_BUDGET: Amount = Amount::new(Decimal::from_parts(2000, 0, 0, false, 0));

/// The profile of the person who owns a data directory.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_budget: Option<Amount>,
}

impl User {
    pub fn monthly_budget(&self) -> Amount {
        self.monthly_budget.unwrap_or(DEFAULT_MONTHLY_BUDGET)
    }
}
