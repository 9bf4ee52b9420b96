pub mod config;
pub mod db;
pub mod error;
pub mod service;
pub mod session_api;
pub mod session_id;
pub mod types;

pub use config::{Config, SessionSettings};
pub use error::PreloadError;
pub use service::{SessionOutcome, preload, preload_with};
