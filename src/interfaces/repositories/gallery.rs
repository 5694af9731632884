use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{self, PgPool};
use uuid::Uuid;

use crate::{
    entities::{
        filter::TagDimension,
        gallery_item::{GalleryItem, GalleryItemInsert, GalleryItemRow, GalleryItemSummary, GalleryItemSummaryRow, GalleryKind},
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxGalleryRepo,
};

/// Storage for published cards and micro-apps. `kind: None` means any kind.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GalleryRepository: Send + Sync {
    /// Stores the item, or returns the id already recorded under its idempotency key.
    async fn create_item(&self, item: &GalleryItemInsert) -> Result<Uuid, AppError>;
    /// Summaries in insertion order.
    async fn list_items(&self, kind: Option<GalleryKind>) -> Result<Vec<GalleryItemSummary>, AppError>;
    async fn get_item(&self, id: &Uuid, kind: Option<GalleryKind>) -> Result<GalleryItem, AppError>;
    async fn upvote(&self, id: &Uuid, kind: Option<GalleryKind>) -> Result<u64, AppError>;
    async fn downvote(&self, id: &Uuid) -> Result<u64, AppError>;
    /// Distinct tags of one dimension, sorted ascending.
    async fn distinct_tags(&self, dimension: TagDimension, kind: Option<GalleryKind>) -> Result<Vec<String>, AppError>;
    async fn check_connection(&self) -> Result<(), AppError>;
}

#[async_trait]
impl<T: GalleryRepository + ?Sized> GalleryRepository for Arc<T> {
    async fn create_item(&self, item: &GalleryItemInsert) -> Result<Uuid, AppError> {
        (**self).create_item(item).await
    }

    async fn list_items(&self, kind: Option<GalleryKind>) -> Result<Vec<GalleryItemSummary>, AppError> {
        (**self).list_items(kind).await
    }

    async fn get_item(&self, id: &Uuid, kind: Option<GalleryKind>) -> Result<GalleryItem, AppError> {
        (**self).get_item(id, kind).await
    }

    async fn upvote(&self, id: &Uuid, kind: Option<GalleryKind>) -> Result<u64, AppError> {
        (**self).upvote(id, kind).await
    }

    async fn downvote(&self, id: &Uuid) -> Result<u64, AppError> {
        (**self).downvote(id).await
    }

    async fn distinct_tags(&self, dimension: TagDimension, kind: Option<GalleryKind>) -> Result<Vec<String>, AppError> {
        (**self).distinct_tags(dimension, kind).await
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        (**self).check_connection().await
    }
}

impl SqlxGalleryRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxGalleryRepo { pool }
    }
}

fn kind_param(kind: Option<GalleryKind>) -> Option<&'static str> {
    kind.map(|k| k.as_str())
}

fn not_found() -> AppError {
    AppError::NotFound("Item not found".into())
}

#[async_trait]
impl GalleryRepository for SqlxGalleryRepo {
    async fn create_item(&self, item: &GalleryItemInsert) -> Result<Uuid, AppError> {
        let inserted: Option<Uuid> = sqlx::query_scalar(
            r#"
            INSERT INTO gallery_items (
                id, kind, title, description, categories, providers,
                card_json, image, idempotency_key, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (idempotency_key) DO NOTHING
            RETURNING id
            "#
        )
        .bind(item.id)
        .bind(item.kind.as_str())
        .bind(&item.title)
        .bind(&item.description)
        .bind(&item.categories)
        .bind(&item.providers)
        .bind(&item.card_json)
        .bind(&item.image)
        .bind(&item.idempotency_key)
        .bind(item.created_at)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(id) = inserted {
            return Ok(id);
        }

        // Conflict on the idempotency key: hand back the earlier record
        let existing: Uuid = sqlx::query_scalar("SELECT id FROM gallery_items WHERE idempotency_key = $1")
            .bind(&item.idempotency_key)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!(id = %existing, "Publish replayed with an existing idempotency key");
        Ok(existing)
    }

    async fn list_items(&self, kind: Option<GalleryKind>) -> Result<Vec<GalleryItemSummary>, AppError> {
        let rows = sqlx::query_as::<_, GalleryItemSummaryRow>(
            r#"
            SELECT id, kind, title, description, categories, providers, upvotes, created_at
            FROM gallery_items
            WHERE ($1::text IS NULL OR kind = $1)
            ORDER BY seq ASC
            "#
        )
        .bind(kind_param(kind))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| GalleryItemSummary::try_from(row).map_err(AppError::InternalError))
            .collect()
    }

    async fn get_item(&self, id: &Uuid, kind: Option<GalleryKind>) -> Result<GalleryItem, AppError> {
        let row = sqlx::query_as::<_, GalleryItemRow>(
            r#"
            SELECT id, kind, title, description, categories, providers,
                   card_json, image, upvotes, created_at
            FROM gallery_items
            WHERE id = $1 AND ($2::text IS NULL OR kind = $2)
            "#
        )
        .bind(id)
        .bind(kind_param(kind))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)?;

        GalleryItem::try_from(row).map_err(AppError::InternalError)
    }

    async fn upvote(&self, id: &Uuid, kind: Option<GalleryKind>) -> Result<u64, AppError> {
        let upvotes: i64 = sqlx::query_scalar(
            r#"
            UPDATE gallery_items SET upvotes = upvotes + 1
            WHERE id = $1 AND ($2::text IS NULL OR kind = $2)
            RETURNING upvotes
            "#
        )
        .bind(id)
        .bind(kind_param(kind))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)?;

        Ok(upvotes.max(0) as u64)
    }

    async fn downvote(&self, id: &Uuid) -> Result<u64, AppError> {
        let upvotes: i64 = sqlx::query_scalar(
            r#"
            UPDATE gallery_items SET upvotes = GREATEST(upvotes - 1, 0)
            WHERE id = $1
            RETURNING upvotes
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)?;

        Ok(upvotes.max(0) as u64)
    }

    async fn distinct_tags(&self, dimension: TagDimension, kind: Option<GalleryKind>) -> Result<Vec<String>, AppError> {
        // The column name comes from a closed enum, never from input
        let sql = format!(
            r#"
            SELECT DISTINCT t.tag
            FROM gallery_items
            CROSS JOIN LATERAL unnest({column}) AS t(tag)
            WHERE ($1::text IS NULL OR kind = $1)
            "#,
            column = dimension.as_str()
        );

        let mut tags: Vec<String> = sqlx::query_scalar(&sql)
            .bind(kind_param(kind))
            .fetch_all(&self.pool)
            .await?;

        // Byte order, independent of the database collation
        tags.sort();
        Ok(tags)
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
