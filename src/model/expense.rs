use crate::error::{Error, Result};
use crate::model::{Amount, Category};
use crate::store::{Collection, Record};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single expense owned by one user.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Expense {
    pub id: String,
    pub user_id: String,
    pub amount: Amount,
    pub category: Category,
    pub description: String,
    /// The calendar date on which the money was spent.
    pub date: NaiveDate,
    /// When the record was created. Used to order recent expenses.
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
}

impl Expense {
    /// Creates a validated expense.
    ///
    /// # Errors
    /// - A validation error if `amount` is negative or `description` is blank.
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        amount: Amount,
        category: Category,
        description: impl Into<String>,
        date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let description = description.into();
        validate_amount(amount)?;
        validate_description(&description)?;
        Ok(Self {
            id: id.into(),
            user_id: user_id.into(),
            amount,
            category,
            description: description.trim().to_string(),
            date,
            created_at,
            receipt_url: None,
        })
    }

    pub fn with_receipt_url(mut self, receipt_url: Option<String>) -> Self {
        self.receipt_url = receipt_url;
        self
    }
}

/// A partial update of an `Expense`. Fields that are `None` are left unchanged.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExpensePatch {
    pub amount: Option<Amount>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub receipt_url: Option<String>,
}

impl ExpensePatch {
    pub fn amount(amount: Amount) -> Self {
        Self {
            amount: Some(amount),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &ExpensePatch::default()
    }

    /// Applies the same rules as `Expense::new` to the fields that are present.
    pub fn validate(&self) -> Result<()> {
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }
}

impl Record for Expense {
    type Patch = ExpensePatch;
    const COLLECTION: Collection = Collection::Expenses;

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn apply(&mut self, patch: &ExpensePatch) {
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(description) = &patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(receipt_url) = &patch.receipt_url {
            self.receipt_url = Some(receipt_url.clone());
        }
    }
}

fn validate_amount(amount: Amount) -> Result<()> {
    if amount.is_negative() {
        return Err(Error::validation(format!(
            "Expense amount cannot be negative, got {amount}"
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(Error::validation("Expense description is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn expense() -> Expense {
        Expense::new(
            "e1",
            "u1",
            Amount::from_str("12.50").unwrap(),
            Category::FoodDining,
            " Lunch ",
            NaiveDate::from_ymd_opt(2026, 10, 3).unwrap(),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_trims_description() {
        assert_eq!(expense().description, "Lunch");
    }

    #[test]
    fn test_new_rejects_negative_amount() {
        let err = Expense::new(
            "e1",
            "u1",
            Amount::from_str("-1").unwrap(),
            Category::Other,
            "x",
            NaiveDate::from_ymd_opt(2026, 10, 3).unwrap(),
            Utc::now(),
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_new_rejects_blank_description() {
        let err = Expense::new(
            "e1",
            "u1",
            Amount::ZERO,
            Category::Other,
            "   ",
            NaiveDate::from_ymd_opt(2026, 10, 3).unwrap(),
            Utc::now(),
        )
        .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("description is required"));
    }

    #[test]
    fn test_apply_partial_patch() {
        let mut e = expense();
        let before = e.clone();
        e.apply(&ExpensePatch::amount(Amount::from_str("42").unwrap()));
        assert_eq!(e.amount, Amount::from_str("42").unwrap());
        assert_eq!(e.description, before.description);
        assert_eq!(e.category, before.category);
        assert_eq!(e.date, before.date);
        assert_eq!(e.created_at, before.created_at);
    }

    #[test]
    fn test_patch_validate() {
        let patch = ExpensePatch {
            description: Some(String::new()),
            ..Default::default()
        };
        assert!(patch.validate().unwrap_err().is_validation());
        assert!(ExpensePatch::default().is_empty());
    }

    #[test]
    fn test_serde_round_trip_keeps_date_format() {
        let e = expense();
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["date"], "2026-10-03");
        assert_eq!(json["category"], "Food & Dining");
        assert_eq!(json["amount"], "12.50");
        assert!(json.get("receipt_url").is_none());
    }
}
