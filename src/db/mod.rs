//! This module is responsible for reading, writing and managing the SQLite database.
//!
//! Each collection is a table of `(seq, id, user_id, data)` rows where `data` is the record
//! serialized as JSON. `seq` preserves insertion order.

mod migrations;

use crate::error::Res;
use crate::model::{Expense, Notification, SpendingLimit};
use crate::store::{NotificationStore, Record, RecordStore, Store};
use anyhow::{bail, Context};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::marker::PhantomData;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub(crate) struct Db {
    expenses: Table<Expense>,
    limits: Table<SpendingLimit>,
    notifications: Table<Notification>,
}

impl Db {
    /// - Validates that there is a SQLite file at `path`
    /// - Creates a SQLite client
    /// - Updates the database schema with migrations if it is out-of-date
    /// - Returns a constructed `Db` object for further operations
    pub(crate) async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!("The SQLite database is missing '{}'", path.display());
        }
        let pool = connect(path, false).await?;
        let from = migrations::upgrade(&pool).await?;
        if from < migrations::latest() {
            debug!(
                "Upgraded database schema from version {from} to {}",
                migrations::latest()
            );
        }
        Ok(Self::new(pool))
    }

    /// - Validates that no file currently exists at `path`
    /// - Creates a new SQLite file at `path`
    /// - Initializes the database schema
    /// - Returns a constructed `Db` object for further operations
    pub(crate) async fn init(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        if path.exists() {
            bail!("A file already exists at '{}'", path.display());
        }
        let pool = connect(path, true).await?;
        migrations::upgrade(&pool).await?;
        debug!("Created SQLite database at {}", path.display());
        Ok(Self::new(pool))
    }

    fn new(pool: SqlitePool) -> Self {
        Self {
            expenses: Table::new(pool.clone()),
            limits: Table::new(pool.clone()),
            notifications: Table::new(pool),
        }
    }
}

impl Store for Db {
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

async fn connect(path: &Path, create: bool) -> Res<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
        .context("Failed to parse SQLite connection string")?
        .create_if_missing(create);
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open SQLite database at {}", path.display()))
}

/// The table that holds the collection for records of type `T`.
#[derive(Debug, Clone)]
struct Table<T> {
    pool: SqlitePool,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Table<T> {
    fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    fn name(&self) -> &'static str {
        T::COLLECTION.table()
    }
}

fn decode<T: Record>(data: &str) -> Res<T> {
    serde_json::from_str(data).with_context(|| {
        format!(
            "Unable to parse a record in the {} table",
            T::COLLECTION.table()
        )
    })
}

#[async_trait]
impl<T: Record> RecordStore<T> for Table<T> {
    async fn get_all(&self, user_id: &str) -> Res<Vec<T>> {
        let order = if T::COLLECTION.newest_first() {
            "DESC"
        } else {
            "ASC"
        };
        let sql = format!(
            "SELECT data FROM {} WHERE user_id = ? ORDER BY seq {order}",
            self.name()
        );
        let rows: Vec<(String,)> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to read from {}", self.name()))?;
        trace!("Read {} rows from {}", rows.len(), self.name());
        rows.iter().map(|(data,)| decode(data)).collect()
    }

    async fn add(&self, record: T) -> Res<T> {
        let data = serde_json::to_string(&record).context("Unable to serialize record")?;
        let sql = format!(
            "INSERT INTO {} (id, user_id, data) VALUES (?, ?, ?)",
            self.name()
        );
        sqlx::query(&sql)
            .bind(record.id())
            .bind(record.user_id())
            .bind(data)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to insert '{}' into {}", record.id(), self.name()))?;
        Ok(record)
    }

    async fn update(&self, id: &str, patch: &T::Patch) -> Res<Option<T>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let select = format!("SELECT data FROM {} WHERE id = ?", self.name());
        let row: Option<(String,)> = sqlx::query_as(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .with_context(|| format!("Failed to read '{id}' from {}", self.name()))?;
        let Some((data,)) = row else {
            debug!("No record '{id}' in {}, nothing to update", self.name());
            return Ok(None);
        };

        let mut record: T = decode(&data)?;
        record.apply(patch);
        let data = serde_json::to_string(&record).context("Unable to serialize record")?;
        let update = format!("UPDATE {} SET data = ? WHERE id = ?", self.name());
        sqlx::query(&update)
            .bind(data)
            .bind(id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to update '{id}' in {}", self.name()))?;

        tx.commit().await.context("Failed to commit update")?;
        Ok(Some(record))
    }

    async fn delete(&self, id: &str) -> Res<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?", self.name());
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete '{id}' from {}", self.name()))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl NotificationStore for Table<Notification> {
    async fn mark_all_as_read(&self, user_id: &str) -> Res<usize> {
        let result = sqlx::query(
            "UPDATE notifications SET data = json_set(data, '$.read', json('true')) \
             WHERE user_id = ? AND json_extract(data, '$.read') = 0",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .context("Failed to mark notifications as read")?;
        Ok(usize::try_from(result.rows_affected()).unwrap_or_default())
    }
}
