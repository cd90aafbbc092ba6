//! In-memory content repository
//!
//! Same contract as the PostgreSQL repository: ids start at 1, listing is
//! ordered by id, and a create that references an unknown content type id
//! persists nothing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::content::{ContentRepository, DbError};
use crate::db::migrations::SEEDED_CONTENT_TYPES;
use crate::models::{Content, ContentType, NewContent};

#[derive(Default)]
struct Store {
    content: Vec<Content>,
    content_types: Vec<ContentType>,
    next_content_id: i32,
    next_detail_id: i32,
}

/// Repository holding everything in process memory
pub struct InMemoryContentRepository {
    store: Mutex<Store>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl Default for InMemoryContentRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryContentRepository {
    /// Empty repository with the same content types the migrations seed.
    pub fn new() -> Self {
        Self::with_content_types(SEEDED_CONTENT_TYPES)
    }

    /// Empty repository with the given content types, ids assigned from 1.
    pub fn with_content_types(names: &[&str]) -> Self {
        let content_types = names
            .iter()
            .zip(1..)
            .map(|(name, id)| ContentType {
                id,
                name: (*name).to_string(),
            })
            .collect();

        Self {
            store: Mutex::new(Store {
                content: Vec::new(),
                content_types,
                next_content_id: 1,
                next_detail_id: 1,
            }),
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail as if the database were unreachable.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of repository calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of stored content aggregates.
    pub fn content_count(&self) -> usize {
        self.lock().content.len()
    }

    /// Store an aggregate as-is, bypassing id assignment and type checks.
    pub fn insert_raw(&self, content: Content) {
        let mut store = self.lock();
        store.next_content_id = store.next_content_id.max(content.id.saturating_add(1));
        if let Some(max_detail) = content.details.iter().map(|d| d.id).max() {
            store.next_detail_id = store.next_detail_id.max(max_detail.saturating_add(1));
        }
        store.content.push(content);
        store.content.sort_by_key(|c| c.id);
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enter(&self) -> Result<(), DbError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(DbError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn get_all_content(&self) -> Result<Vec<Content>, DbError> {
        self.enter()?;
        Ok(self.lock().content.clone())
    }

    async fn create_content_with_details(&self, content: &NewContent) -> Result<Content, DbError> {
        self.enter()?;
        let mut store = self.lock();

        // Mirror the foreign key: check every detail before writing anything
        if let Some(missing) = content
            .details
            .iter()
            .find(|d| !store.content_types.iter().any(|ct| ct.id == d.content_type_id))
        {
            return Err(DbError::Sqlx(sqlx::Error::Protocol(format!(
                "insert on content_details violates foreign key: content_type_id {}",
                missing.content_type_id
            ))));
        }

        let exhausted = || DbError::Sqlx(sqlx::Error::Protocol("id sequence exhausted".into()));
        let count = i32::try_from(content.details.len()).map_err(|_| exhausted())?;

        let id = store.next_content_id;
        let first_detail = store.next_detail_id;
        let next_content_id = id.checked_add(1).ok_or_else(exhausted)?;
        let next_detail_id = first_detail.checked_add(count).ok_or_else(exhausted)?;
        let detail_ids: Vec<i32> = (first_detail..next_detail_id).collect();

        store.next_content_id = next_content_id;
        store.next_detail_id = next_detail_id;

        let persisted = content.clone().into_persisted(id, detail_ids);
        store.content.push(persisted.clone());
        Ok(persisted)
    }

    async fn get_content_type_by_name(&self, name: &str) -> Result<Option<ContentType>, DbError> {
        self.enter()?;
        Ok(self
            .lock()
            .content_types
            .iter()
            .find(|ct| ct.name == name)
            .cloned())
    }

    async fn get_content_type_by_id(&self, id: i32) -> Result<Option<ContentType>, DbError> {
        self.enter()?;
        Ok(self
            .lock()
            .content_types
            .iter()
            .find(|ct| ct.id == id)
            .cloned())
    }
}
