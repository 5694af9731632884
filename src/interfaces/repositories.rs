pub mod gallery;
pub mod memory;
pub mod preview;
pub mod sqlx_repo;
