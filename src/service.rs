//! The single entry point for creating and listing reviews.

use crate::db::ReviewStore;
use crate::error::ServiceError;
use crate::models::{utc_timestamp, Review};
use crate::sentiment::SentimentClassifier;

/// Binds classification to storage: a review's sentiment is computed exactly
/// once, here, from the text being stored.
#[derive(Debug, Clone)]
pub struct ReviewService<S> {
    store: S,
    classifier: SentimentClassifier,
}

impl<S: ReviewStore> ReviewService<S> {
    pub fn new(store: S) -> Self {
        Self::with_classifier(store, SentimentClassifier::new())
    }

    pub fn with_classifier(store: S, classifier: SentimentClassifier) -> Self {
        Self { store, classifier }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Classify `text`, stamp it with the current UTC time and store it.
    ///
    /// Text that is empty after trimming is rejected with
    /// [`ServiceError::Validation`]. Storage failures are passed through as
    /// they are; nothing is retried.
    pub async fn add(&self, text: &str) -> Result<Review, ServiceError> {
        if text.trim().is_empty() {
            return Err(ServiceError::Validation(
                "review text must not be empty".to_string(),
            ));
        }

        let sentiment = self.classifier.classify(text);
        let review = self
            .store
            .append(text, sentiment, &utc_timestamp())
            .await?;
        Ok(review)
    }

    /// An empty filter lists everything; any other value is matched against
    /// the stored labels verbatim.
    pub async fn list(&self, filter: &str) -> Result<Vec<Review>, ServiceError> {
        let reviews = if filter.is_empty() {
            self.store.fetch_all().await?
        } else {
            self.store.fetch_by_sentiment(filter).await?
        };
        Ok(reviews)
    }
}
