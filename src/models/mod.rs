pub mod review;

pub use review::{utc_timestamp, Review, Sentiment, UnknownSentiment};
