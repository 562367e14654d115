pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod security;

// Re-export main components for easier use
pub use error::Error;
