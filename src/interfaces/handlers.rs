pub mod gallery;
pub mod home;
pub mod pages;
pub mod preview;
pub mod studio;
pub mod system;
