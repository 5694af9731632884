pub mod gallery;
pub mod gallery_view;
pub mod preview;
pub mod studio;
