pub mod client;
pub mod db;
pub mod upstream;
pub mod utils;
