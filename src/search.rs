//! Filtering a user's expense history.

use crate::model::{Amount, Category, Expense};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Criteria for `search`. Every field that is `None` matches everything.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExpenseQuery {
    /// Case-insensitive text found in the description or the category name.
    pub term: Option<String>,
    pub category: Option<Category>,
    /// Inclusive.
    pub from: Option<NaiveDate>,
    /// Inclusive.
    pub to: Option<NaiveDate>,
    /// Inclusive.
    pub min_amount: Option<Amount>,
    /// Inclusive.
    pub max_amount: Option<Amount>,
}

impl ExpenseQuery {
    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(term) = self.term.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            let in_description = expense.description.to_lowercase().contains(&term);
            let in_category = expense.category.name().to_lowercase().contains(&term);
            if !in_description && !in_category {
                return false;
            }
        }
        self.category.is_none_or(|c| expense.category == c)
            && self.from.is_none_or(|d| expense.date >= d)
            && self.to.is_none_or(|d| expense.date <= d)
            && self.min_amount.is_none_or(|a| expense.amount >= a)
            && self.max_amount.is_none_or(|a| expense.amount <= a)
    }
}

/// The expenses that matched a query, newest first.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub expenses: Vec<Expense>,
    pub count: usize,
    pub total: Amount,
}

/// Returns the expenses that match `query`, sorted by creation time, newest first.
pub fn search(expenses: &[Expense], query: &ExpenseQuery) -> SearchResult {
    let mut found: Vec<Expense> = expenses
        .iter()
        .filter(|e| query.matches(e))
        .cloned()
        .collect();
    found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    SearchResult {
        count: found.len(),
        total: found.iter().map(|e| e.amount).sum(),
        expenses: found,
    }
}
