//! Process-local storage used when no database is configured.

use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::{
    entities::{
        filter::{TagDimension, Tagged},
        gallery_item::{GalleryItem, GalleryItemInsert, GalleryItemSummary, GalleryKind},
        preview::Preview,
    },
    errors::AppError,
    repositories::{gallery::GalleryRepository, preview::PreviewRepository},
};

#[derive(Default)]
struct GalleryStore {
    items: Vec<GalleryItem>,
    idempotency_keys: HashMap<String, Uuid>,
}

impl GalleryStore {
    fn find_mut(&mut self, id: &Uuid, kind: Option<GalleryKind>) -> Option<&mut GalleryItem> {
        self.items
            .iter_mut()
            .find(|item| item.id == *id && kind.is_none_or(|k| item.kind == k))
    }
}

#[derive(Clone, Default)]
pub struct MemoryGalleryRepo {
    inner: Arc<RwLock<GalleryStore>>,
}

impl MemoryGalleryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Item not found".into())
}

#[async_trait]
impl GalleryRepository for MemoryGalleryRepo {
    async fn create_item(&self, item: &GalleryItemInsert) -> Result<Uuid, AppError> {
        let mut store = self.inner.write();

        if let Some(key) = &item.idempotency_key {
            if let Some(existing) = store.idempotency_keys.get(key) {
                tracing::info!(id = %existing, "Publish replayed with an existing idempotency key");
                return Ok(*existing);
            }
            store.idempotency_keys.insert(key.clone(), item.id);
        }

        store.items.push(item.clone().into_item());
        Ok(item.id)
    }

    async fn list_items(&self, kind: Option<GalleryKind>) -> Result<Vec<GalleryItemSummary>, AppError> {
        let store = self.inner.read();
        Ok(store
            .items
            .iter()
            .filter(|item| kind.is_none_or(|k| item.kind == k))
            .map(GalleryItem::to_summary)
            .collect())
    }

    async fn get_item(&self, id: &Uuid, kind: Option<GalleryKind>) -> Result<GalleryItem, AppError> {
        let store = self.inner.read();
        store
            .items
            .iter()
            .find(|item| item.id == *id && kind.is_none_or(|k| item.kind == k))
            .cloned()
            .ok_or_else(not_found)
    }

    async fn upvote(&self, id: &Uuid, kind: Option<GalleryKind>) -> Result<u64, AppError> {
        let mut store = self.inner.write();
        let item = store.find_mut(id, kind).ok_or_else(not_found)?;
        item.upvotes = item.upvotes.saturating_add(1);
        Ok(item.upvotes)
    }

    async fn downvote(&self, id: &Uuid) -> Result<u64, AppError> {
        let mut store = self.inner.write();
        let item = store.find_mut(id, None).ok_or_else(not_found)?;
        item.upvotes = item.upvotes.saturating_sub(1);
        Ok(item.upvotes)
    }

    async fn distinct_tags(&self, dimension: TagDimension, kind: Option<GalleryKind>) -> Result<Vec<String>, AppError> {
        let store = self.inner.read();
        let tags: BTreeSet<&String> = store
            .items
            .iter()
            .filter(|item| kind.is_none_or(|k| item.kind == k))
            .flat_map(|item| item.tags(dimension))
            .collect();

        Ok(tags.into_iter().cloned().collect())
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryPreviewRepo {
    inner: Arc<RwLock<HashMap<Uuid, Preview>>>,
}

impl MemoryPreviewRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreviewRepository for MemoryPreviewRepo {
    async fn create_preview(&self, preview: &Preview) -> Result<(), AppError> {
        self.inner.write().insert(preview.id, preview.clone());
        Ok(())
    }

    async fn get_preview(&self, id: &Uuid) -> Result<Preview, AppError> {
        self.inner
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Preview not found".into()))
    }
}
