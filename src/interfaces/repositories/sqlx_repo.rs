use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxGalleryRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxPreviewRepo {
    pub pool: PgPool,
}
