use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The closed set of expense categories.
///
/// Categories serialize and display as their human-readable names, e.g. `Food & Dining`. When
/// parsing, the name is matched case-insensitively, and a kebab-case slug such as `food-dining` or
/// `bills-utilities` is also accepted so that categories are easy to type on the command line.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub enum Category {
    #[default]
    #[serde(rename = "Food & Dining")]
    FoodDining,
    #[serde(rename = "Transportation")]
    Transportation,
    #[serde(rename = "Shopping")]
    Shopping,
    #[serde(rename = "Entertainment")]
    Entertainment,
    #[serde(rename = "Bills & Utilities")]
    BillsUtilities,
    #[serde(rename = "Healthcare")]
    Healthcare,
    #[serde(rename = "Travel")]
    Travel,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Personal Care")]
    PersonalCare,
    #[serde(rename = "Other")]
    Other,
}

serde_plain::derive_display_from_serialize!(Category);

impl Category {
    /// All categories in their display order.
    pub const ALL: [Category; 10] = [
        Category::FoodDining,
        Category::Transportation,
        Category::Shopping,
        Category::Entertainment,
        Category::BillsUtilities,
        Category::Healthcare,
        Category::Travel,
        Category::Education,
        Category::PersonalCare,
        Category::Other,
    ];

    /// The human-readable name, e.g. `Bills & Utilities`.
    pub fn name(&self) -> &'static str {
        match self {
            Category::FoodDining => "Food & Dining",
            Category::Transportation => "Transportation",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::BillsUtilities => "Bills & Utilities",
            Category::Healthcare => "Healthcare",
            Category::Travel => "Travel",
            Category::Education => "Education",
            Category::PersonalCare => "Personal Care",
            Category::Other => "Other",
        }
    }

    /// The kebab-case slug, e.g. `bills-utilities`.
    pub fn slug(&self) -> String {
        slugify(self.name())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = slugify(s);
        match Category::ALL.iter().find(|c| c.slug() == wanted) {
            Some(category) => Ok(*category),
            None => bail!(
                "Invalid category '{s}', expected one of: {}",
                Category::ALL
                    .iter()
                    .map(|c| c.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

/// Lowercases `s` and joins its alphanumeric words with `-`, so `Food & Dining` becomes
/// `food-dining`.
fn slugify(s: &str) -> String {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
