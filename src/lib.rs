//! Review storage with keyword-based sentiment tagging.
//!
//! Every review is classified once, when it is added, by counting positive
//! and negative marker fragments in its text. Reviews live in SQLite and can
//! be listed in full or filtered by sentiment.

#[cfg(feature = "server")]
pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod sentiment;
pub mod service;

pub use config::ServerConfig;
pub use db::{Database, ReviewStore};
pub use error::{ServiceError, StorageError};
pub use models::{Review, Sentiment};
pub use sentiment::SentimentClassifier;
pub use service::ReviewService;
