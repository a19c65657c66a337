//! The record store interface.
//!
//! There are three independent collections: expenses, limits and notifications. Every record is
//! tagged with the id of the user who owns it. A store supports appending a record, scanning every
//! record of one user, and updating or deleting a single record by id. Updating or deleting an id
//! that does not exist is a silent no-op.
//!
//! Two implementations exist: `MemoryStore`, and the SQLite-backed `crate::db::Db`.

mod memory;

use crate::error::Res;
use crate::model::{Expense, MarkRead, Notification, SpendingLimit};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

pub use memory::MemoryStore;

/// Names one of the three collections.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Collection {
    Expenses,
    Limits,
    Notifications,
}

impl Collection {
    /// The SQLite table that holds the collection.
    pub fn table(&self) -> &'static str {
        match self {
            Collection::Expenses => "expenses",
            Collection::Limits => "limits",
            Collection::Notifications => "notifications",
        }
    }

    /// Notifications are scanned newest first. The other collections come back in insertion order.
    pub fn newest_first(&self) -> bool {
        matches!(self, Collection::Notifications)
    }
}

/// A record that can be kept in a store.
pub trait Record: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The partial update this record accepts.
    type Patch: Debug + Send + Sync;

    /// The collection this record belongs to.
    const COLLECTION: Collection;

    fn id(&self) -> &str;

    fn user_id(&self) -> &str;

    /// Replaces the fields present in `patch`, leaving everything else unchanged.
    fn apply(&mut self, patch: &Self::Patch);
}

/// Storage for one collection of records.
#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    /// Returns every record owned by `user_id`.
    async fn get_all(&self, user_id: &str) -> Res<Vec<T>>;

    /// Appends `record` and returns it.
    async fn add(&self, record: T) -> Res<T>;

    /// Applies `patch` to the record with `id`. Returns the updated record, or `None` if there is
    /// no such record.
    async fn update(&self, id: &str, patch: &T::Patch) -> Res<Option<T>>;

    /// Removes the record with `id`. Returns `false` if there was no such record.
    async fn delete(&self, id: &str) -> Res<bool>;
}

/// The notification collection, which additionally tracks read state.
#[async_trait]
pub trait NotificationStore: RecordStore<Notification> {
    /// Marks one notification as read. Returns `false` if there is no such notification.
    async fn mark_as_read(&self, id: &str) -> Res<bool> {
        Ok(self.update(id, &MarkRead).await?.is_some())
    }

    /// Marks every unread notification owned by `user_id` as read and returns how many changed.
    async fn mark_all_as_read(&self, user_id: &str) -> Res<usize> {
        let mut count = 0;
        for notification in self.get_all(user_id).await? {
            if !notification.read && self.update(&notification.id, &MarkRead).await?.is_some() {
                count += 1;
            }
        }
        Ok(count)
    }
}

/// Access to all three collections.
pub trait Store: Send + Sync {
    fn expenses(&self) -> &dyn RecordStore<Expense>;

    fn limits(&self) -> &dyn RecordStore<SpendingLimit>;

    fn notifications(&self) -> &dyn NotificationStore;
}
