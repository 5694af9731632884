use crate::{
    entities::{
        filter::{retain_matching, FilterState, TagDimension},
        gallery_item::{GalleryItem, GalleryItemSummary, GalleryKind, PublishRequest, PublishedResponse, UpvoteResponse},
    },
    errors::AppError,
    repositories::gallery::GalleryRepository,
    utils::valid_uuid::valid_uuid,
};

pub struct GalleryHandler<R>
where
    R: GalleryRepository,
{
    pub gallery_repo: R,
}

fn item_noun(kind: Option<GalleryKind>) -> &'static str {
    match kind {
        Some(GalleryKind::Card) => "Card",
        Some(GalleryKind::MicroApp) => "Micro-app",
        None => "Item",
    }
}

/// Rewrites the repository's generic not-found into one naming the kind.
fn named_not_found(kind: Option<GalleryKind>) -> impl FnOnce(AppError) -> AppError {
    move |e| match e {
        AppError::NotFound(_) => AppError::NotFound(format!("{} not found", item_noun(kind))),
        other => other,
    }
}

impl<R> GalleryHandler<R>
where
    R: GalleryRepository,
{
    pub fn new(gallery_repo: R) -> Self {
        GalleryHandler { gallery_repo }
    }

    /// Lists one gallery, narrowed by the same filter engine the page uses.
    pub async fn list_items(&self, kind: GalleryKind, filters: &FilterState) -> Result<Vec<GalleryItemSummary>, AppError> {
        let items = self.gallery_repo.list_items(Some(kind)).await?;
        Ok(retain_matching(items, filters))
    }

    pub async fn list_tags(&self, dimension: TagDimension, kind: Option<GalleryKind>) -> Result<Vec<String>, AppError> {
        self.gallery_repo.distinct_tags(dimension, kind).await
    }

    pub async fn get_item(&self, id: &str, kind: GalleryKind) -> Result<GalleryItem, AppError> {
        let valid_id = valid_uuid(id, item_noun(Some(kind)))?;
        self.gallery_repo
            .get_item(&valid_id, Some(kind))
            .await
            .map_err(named_not_found(Some(kind)))
    }

    pub async fn upvote(&self, id: &str, kind: Option<GalleryKind>) -> Result<UpvoteResponse, AppError> {
        let valid_id = valid_uuid(id, item_noun(kind))?;
        let upvotes = self.gallery_repo
            .upvote(&valid_id, kind)
            .await
            .map_err(named_not_found(kind))?;

        tracing::debug!(id = %valid_id, upvotes, "Upvote recorded");
        Ok(UpvoteResponse { upvotes })
    }

    pub async fn downvote(&self, id: &str) -> Result<UpvoteResponse, AppError> {
        let valid_id = valid_uuid(id, item_noun(None))?;
        let upvotes = self.gallery_repo
            .downvote(&valid_id)
            .await
            .map_err(named_not_found(None))?;

        Ok(UpvoteResponse { upvotes })
    }

    /// Validates and stores a new item. Nothing is written when validation fails.
    pub async fn publish(&self, request: PublishRequest) -> Result<PublishedResponse, AppError> {
        let insert = request.prepare_for_insert()?;
        let id = self.gallery_repo.create_item(&insert).await?;

        tracing::info!(%id, kind = %insert.kind, title = %insert.title, "Gallery item published");
        Ok(PublishedResponse { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::gallery::MockGalleryRepository;
    use chrono::Utc;
    use mockall::predicate::eq;
    use serde_json::json;
    use uuid::Uuid;

    const PNG_PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    fn summary(title: &str, categories: &[&str], providers: &[&str]) -> GalleryItemSummary {
        GalleryItemSummary {
            id: Uuid::new_v4(),
            kind: GalleryKind::MicroApp,
            title: title.into(),
            description: "desc".into(),
            categories: categories.iter().map(|s| s.to_string()).collect(),
            providers: providers.iter().map(|s| s.to_string()).collect(),
            upvotes: 0,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn list_applies_filters_after_loading_kind() {
        let mut repo = MockGalleryRepository::new();
        repo.expect_list_items()
            .with(eq(Some(GalleryKind::MicroApp)))
            .times(1)
            .returning(|_| {
                Ok(vec![
                    summary("A", &["HR"], &["Google Workspace"]),
                    summary("B", &["HR", "IT"], &["Microsoft 365"]),
                ])
            });

        let handler = GalleryHandler::new(repo);
        let filters = FilterState::from_query(Some("HR"), Some("Microsoft 365"));
        let items = handler.list_items(GalleryKind::MicroApp, &filters).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "B");
    }

    #[tokio::test]
    async fn malformed_id_never_reaches_repository() {
        let repo = MockGalleryRepository::new();
        let handler = GalleryHandler::new(repo);

        let err = handler.get_item("not-a-uuid", GalleryKind::Card).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Card not found"));
    }

    #[tokio::test]
    async fn unknown_item_is_named_by_kind() {
        let mut repo = MockGalleryRepository::new();
        repo.expect_upvote()
            .returning(|_, _| Err(AppError::NotFound("Item not found".into())));

        let handler = GalleryHandler::new(repo);
        let err = handler
            .upvote(&Uuid::new_v4().to_string(), Some(GalleryKind::MicroApp))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Micro-app not found"));
    }

    #[tokio::test]
    async fn invalid_publish_stores_nothing() {
        let mut repo = MockGalleryRepository::new();
        repo.expect_create_item().never();

        let handler = GalleryHandler::new(repo);
        let request = PublishRequest {
            title: "No tags".into(),
            ..PublishRequest::default()
        };

        let err = handler.publish(request).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(details) if !details.is_empty()));
    }

    #[tokio::test]
    async fn valid_publish_returns_repository_id() {
        let id = Uuid::new_v4();
        let mut repo = MockGalleryRepository::new();
        repo.expect_create_item()
            .withf(|insert| insert.kind == GalleryKind::Card && insert.categories == vec!["HR".to_string()])
            .times(1)
            .returning(move |_| Ok(id));

        let handler = GalleryHandler::new(repo);
        let request = PublishRequest {
            kind: GalleryKind::Card,
            title: "Leave request".into(),
            description: "Ask for time off".into(),
            categories: vec!["HR".into()],
            providers: vec!["Slack".into()],
            card_json: json!({"type": "AdaptiveCard"}),
            image: PNG_PIXEL.into(),
            idempotency_key: None,
        };

        assert_eq!(handler.publish(request).await.unwrap(), PublishedResponse { id });
    }
}
