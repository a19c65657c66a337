//! Types that represent the core data model, such as `Expense`, `SpendingLimit` and
//! `Notification`.
mod amount;
mod category;
mod expense;
mod limit;
mod notification;
mod user;

pub use amount::{Amount, AmountError};
pub use category::Category;
pub use expense::{Expense, ExpensePatch};
pub use limit::{LimitPatch, Period, SpendingLimit};
pub use notification::{AlertKey, AlertKind, MarkRead, Notification, NotificationType};
pub use user::{User, DEFAULT_MONTHLY_BUDGET};
