use crate::model::{Amount, Category, Expense};
use serde::{Deserialize, Serialize};

/// The total spent in one category.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: Amount,
}

/// Sums `expenses` by category.
///
/// There is one row per category that appears in `expenses`, in the order each category first
/// appears. Categories with no expenses get no row.
pub fn category_totals(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for expense in expenses {
        match totals.iter_mut().find(|t| t.category == expense.category) {
            Some(total) => total.amount += expense.amount,
            None => totals.push(CategoryTotal {
                category: expense.category,
                amount: expense.amount,
            }),
        }
    }
    totals
}

/// The `n` largest totals, largest first. Ties keep their input order.
pub fn top_categories(totals: &[CategoryTotal], n: usize) -> Vec<CategoryTotal> {
    let mut sorted = totals.to_vec();
    sorted.sort_by(|a, b| b.amount.cmp(&a.amount));
    sorted.truncate(n);
    sorted
}
