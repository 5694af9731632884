use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    entities::preview::{Preview, PreviewRow},
    errors::AppError,
    repositories::sqlx_repo::SqlxPreviewRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreviewRepository: Send + Sync {
    async fn create_preview(&self, preview: &Preview) -> Result<(), AppError>;
    async fn get_preview(&self, id: &Uuid) -> Result<Preview, AppError>;
}

#[async_trait]
impl<T: PreviewRepository + ?Sized> PreviewRepository for Arc<T> {
    async fn create_preview(&self, preview: &Preview) -> Result<(), AppError> {
        (**self).create_preview(preview).await
    }

    async fn get_preview(&self, id: &Uuid) -> Result<Preview, AppError> {
        (**self).get_preview(id).await
    }
}

impl SqlxPreviewRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxPreviewRepo { pool }
    }
}

#[async_trait]
impl PreviewRepository for SqlxPreviewRepo {
    async fn create_preview(&self, preview: &Preview) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO previews (id, app_name, logo, selected_apps, published_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#
        )
        .bind(preview.id)
        .bind(&preview.app_name)
        .bind(&preview.logo)
        .bind(Json(&preview.selected_apps))
        .bind(preview.published_at)
        .bind(preview.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_preview(&self, id: &Uuid) -> Result<Preview, AppError> {
        let row = sqlx::query_as::<_, PreviewRow>(
            r#"
            SELECT id, app_name, logo, selected_apps, published_at, created_at
            FROM previews
            WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Preview not found".into()),
            other => AppError::from(other),
        })?;

        Ok(Preview::from(row))
    }
}
