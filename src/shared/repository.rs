use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::error::{AppError, Result};

/// Current time at the precision PostgreSQL stores (microseconds), so a
/// record compares equal before and after a round trip.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// A UUID-keyed row that is hidden by setting `deleted_at` instead of being
/// removed.
pub trait SoftDeletable: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    fn is_trashed(&self) -> bool {
        self.deleted_at().is_some()
    }
}

/// Storage for soft-deletable records.
///
/// Reads skip trashed rows unless stated otherwise.
#[async_trait]
pub trait Repository<R: SoftDeletable>: Send + Sync {
    /// All live records in creation order
    async fn list(&self) -> Result<Vec<R>>;

    async fn find(&self, id: Uuid) -> Result<Option<R>>;

    /// Lookup that also returns trashed records
    async fn find_with_trashed(&self, id: Uuid) -> Result<Option<R>>;

    async fn insert(&self, record: &R) -> Result<()>;

    /// Overwrite the stored row with the same id. Returns `false` when no
    /// such row exists.
    async fn save(&self, record: &R) -> Result<bool>;
}

/// Process-local repository used by tests and when no database is configured
pub struct InMemoryRepository<R> {
    rows: RwLock<Vec<R>>,
}

impl<R> InMemoryRepository<R> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<R> Default for InMemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: SoftDeletable> Repository<R> for InMemoryRepository<R> {
    async fn list(&self) -> Result<Vec<R>> {
        let rows = self.rows.read().await;
        let mut live: Vec<R> = rows.iter().filter(|r| !r.is_trashed()).cloned().collect();
        live.sort_by_key(|r| (r.created_at(), r.id()));
        Ok(live)
    }

    async fn find(&self, id: Uuid) -> Result<Option<R>> {
        Ok(self
            .find_with_trashed(id)
            .await?
            .filter(|r| !r.is_trashed()))
    }

    async fn find_with_trashed(&self, id: Uuid) -> Result<Option<R>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|r| r.id() == id).cloned())
    }

    async fn insert(&self, record: &R) -> Result<()> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|r| r.id() == record.id()) {
            return Err(AppError::Internal(format!(
                "Duplicate record id {}",
                record.id()
            )));
        }
        rows.push(record.clone());
        Ok(())
    }

    async fn save(&self, record: &R) -> Result<bool> {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|r| r.id() == record.id()) {
            Some(row) => {
                *row = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
