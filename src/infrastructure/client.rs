pub mod gallery_client;

pub use gallery_client::{ClientError, GalleryClient};
