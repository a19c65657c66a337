use crate::error::Res;
use crate::model::{Expense, Notification, SpendingLimit};
use crate::store::{NotificationStore, Record, RecordStore, Store};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// One collection held in a `Vec`.
#[derive(Debug)]
pub(crate) struct MemoryCollection<T> {
    records: Mutex<Vec<T>>,
}

impl<T> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for MemoryCollection<T> {
    async fn get_all(&self, user_id: &str) -> Res<Vec<T>> {
        let records = self.records.lock().await;
        Ok(records
            .iter()
            .filter(|r| r.user_id() == user_id)
            .cloned()
            .collect())
    }

    async fn add(&self, record: T) -> Res<T> {
        let mut records = self.records.lock().await;
        if T::COLLECTION.newest_first() {
            records.insert(0, record.clone());
        } else {
            records.push(record.clone());
        }
        Ok(record)
    }

    async fn update(&self, id: &str, patch: &T::Patch) -> Res<Option<T>> {
        let mut records = self.records.lock().await;
        Ok(records.iter_mut().find(|r| r.id() == id).map(|r| {
            r.apply(patch);
            r.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Res<bool> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|r| r.id() != id);
        Ok(records.len() != before)
    }
}

#[async_trait]
impl NotificationStore for MemoryCollection<Notification> {
    async fn mark_all_as_read(&self, user_id: &str) -> Res<usize> {
        let mut records = self.records.lock().await;
        let mut count = 0;
        for n in records
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.read)
        {
            n.read = true;
            count += 1;
        }
        Ok(count)
    }
}

/// A store that keeps everything in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    expenses: MemoryCollection<Expense>,
    limits: MemoryCollection<SpendingLimit>,
    notifications: MemoryCollection<Notification>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn expenses(&self) -> &dyn RecordStore<Expense> {
        &self.expenses
    }

    fn limits(&self) -> &dyn RecordStore<SpendingLimit> {
        &self.limits
    }

    fn notifications(&self) -> &dyn NotificationStore {
        &self.notifications
    }
}
