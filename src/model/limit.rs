use crate::error::{Error, Result};
use crate::model::{Amount, Category};
use crate::store::{Collection, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The declared recurrence of a spending limit.
///
/// Progress is always measured against month-to-date spending, whatever the period says. The
/// period is kept for display and for the one-limit-per-(category, period) rule.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Weekly,
    #[default]
    Monthly,
}

serde_plain::derive_display_from_serialize!(Period);
serde_plain::derive_fromstr_from_deserialize!(Period);

/// A spending cap for one category.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SpendingLimit {
    pub id: String,
    pub user_id: String,
    pub category: Category,
    pub amount: Amount,
    pub period: Period,
    pub created_at: DateTime<Utc>,
}

impl SpendingLimit {
    /// Creates a validated limit.
    ///
    /// # Errors
    /// - A validation error if `amount` is not greater than zero.
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        category: Category,
        amount: Amount,
        period: Period,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        validate_limit_amount(amount)?;
        Ok(Self {
            id: id.into(),
            user_id: user_id.into(),
            category,
            amount,
            period,
            created_at,
        })
    }

    /// Returns true if `other` occupies the same (user, category, period) slot as this limit.
    pub fn conflicts_with(&self, other: &SpendingLimit) -> bool {
        self.id != other.id
            && self.user_id == other.user_id
            && self.category == other.category
            && self.period == other.period
    }
}

/// A partial update of a `SpendingLimit`. Fields that are `None` are left unchanged.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LimitPatch {
    pub category: Option<Category>,
    pub amount: Option<Amount>,
    pub period: Option<Period>,
}

impl LimitPatch {
    pub fn validate(&self) -> Result<()> {
        if let Some(amount) = self.amount {
            validate_limit_amount(amount)?;
        }
        Ok(())
    }
}

impl Record for SpendingLimit {
    type Patch = LimitPatch;
    const COLLECTION: Collection = Collection::Limits;

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn apply(&mut self, patch: &LimitPatch) {
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(period) = patch.period {
            self.period = period;
        }
    }
}

fn validate_limit_amount(amount: Amount) -> Result<()> {
    if !amount.is_positive() {
        return Err(Error::validation(format!(
            "Amount must be greater than 0, got {amount}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn limit(id: &str, category: Category, period: Period) -> SpendingLimit {
        SpendingLimit::new(
            id,
            "u1",
            category,
            Amount::from_str("100").unwrap(),
            period,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        for bad in ["0", "-5"] {
            let err = SpendingLimit::new(
                "l1",
                "u1",
                Category::Travel,
                Amount::from_str(bad).unwrap(),
                Period::Monthly,
                Utc::now(),
            )
            .unwrap_err();
            assert!(err.is_validation());
        }
    }

    #[test]
    fn test_conflicts_with() {
        let a = limit("a", Category::Travel, Period::Monthly);
        let b = limit("b", Category::Travel, Period::Monthly);
        let c = limit("c", Category::Travel, Period::Weekly);
        assert!(a.conflicts_with(&b));
        assert!(!a.conflicts_with(&c));
        assert!(!a.conflicts_with(&a));
    }

    #[test]
    fn test_period_display() {
        assert_eq!(Period::Weekly.to_string(), "weekly");
        assert_eq!(Period::from_str("monthly").unwrap(), Period::Monthly);
    }

    #[test]
    fn test_apply_patch() {
        let mut l = limit("a", Category::Travel, Period::Monthly);
        l.apply(&LimitPatch {
            period: Some(Period::Weekly),
            ..Default::default()
        });
        assert_eq!(l.period, Period::Weekly);
        assert_eq!(l.category, Category::Travel);
    }
}
