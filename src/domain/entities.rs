pub mod filter;
pub mod gallery_item;
pub mod preview;
pub mod studio;
