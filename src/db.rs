use crate::error::StorageError;
use crate::models::{Review, Sentiment};
use async_trait::async_trait;
use rusqlite::{params, Connection, Params, Statement};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

/// How long an operation may wait for the connection before giving up.
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Durable keeper of every review.
///
/// Implementations assign identities themselves: each `append` gets an id
/// strictly greater than any id handed out before, including ids handed out
/// before a restart. Ids do not have to be contiguous. A failed `append`
/// leaves nothing behind.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn append(
        &self,
        text: &str,
        sentiment: Sentiment,
        created_at: &str,
    ) -> Result<Review, StorageError>;

    /// All reviews, oldest first.
    async fn fetch_all(&self) -> Result<Vec<Review>, StorageError>;

    /// Reviews labelled `sentiment`, oldest first. Labels nobody uses give an
    /// empty list.
    async fn fetch_by_sentiment(&self, sentiment: &str) -> Result<Vec<Review>, StorageError>;
}

// Define a struct to represent a database connection
#[derive(Debug, Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    timeout: Duration,
}

impl Database {
    // Create a new database connection
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        Self::with_timeout(db_path, DEFAULT_STORAGE_TIMEOUT)
    }

    pub fn with_timeout(db_path: &str, timeout: Duration) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(timeout)?;
        debug!("[DB] Connection established at: {}", db_path);
        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
            timeout,
        })
    }

    // Create the database schema
    pub async fn create_schema(&self) -> Result<(), StorageError> {
        let conn = self.lock().await?;
        // AUTOINCREMENT keeps ids from being reused after the newest row is gone
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS reviews (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                text TEXT NOT NULL,
                sentiment TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_reviews_sentiment ON reviews (sentiment);",
        )?;
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, StorageError> {
        let conn = self.lock().await?;
        let count = conn.query_row("SELECT COUNT(*) FROM reviews", [], |row| row.get(0))?;
        Ok(count)
    }

    async fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        let lock_start = Instant::now();
        let guard = tokio::time::timeout(self.timeout, self.conn.lock())
            .await
            .map_err(|_| StorageError::Timeout(self.timeout))?;
        debug!("[DB] Lock acquired in {:?}", lock_start.elapsed());
        Ok(guard)
    }
}

#[async_trait]
impl ReviewStore for Database {
    async fn append(
        &self,
        text: &str,
        sentiment: Sentiment,
        created_at: &str,
    ) -> Result<Review, StorageError> {
        let mut conn = self.lock().await?;

        // Dropping an uncommitted transaction rolls it back, sequence included
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO reviews (text, sentiment, created_at) VALUES (?1, ?2, ?3)",
            params![text, sentiment.as_str(), created_at],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        debug!("[DB] Stored review {} as {}", id, sentiment);
        Ok(Review {
            id,
            text: text.to_string(),
            sentiment,
            created_at: created_at.to_string(),
        })
    }

    async fn fetch_all(&self) -> Result<Vec<Review>, StorageError> {
        let conn = self.lock().await?;
        let mut stmt =
            conn.prepare("SELECT id, text, sentiment, created_at FROM reviews ORDER BY id ASC")?;
        let reviews = read_reviews(&mut stmt, [])?;
        debug!("[DB] Fetched {} reviews", reviews.len());
        Ok(reviews)
    }

    async fn fetch_by_sentiment(&self, sentiment: &str) -> Result<Vec<Review>, StorageError> {
        let conn = self.lock().await?;
        let mut stmt = conn.prepare(
            "SELECT id, text, sentiment, created_at FROM reviews
             WHERE sentiment = ?1
             ORDER BY id ASC",
        )?;
        let reviews = read_reviews(&mut stmt, [sentiment])?;
        debug!("[DB] Fetched {} '{}' reviews", reviews.len(), sentiment);
        Ok(reviews)
    }
}

// Columns must be selected as (id, text, sentiment, created_at)
fn read_reviews<P: Params>(stmt: &mut Statement<'_>, params: P) -> Result<Vec<Review>, StorageError> {
    let rows = stmt.query_map(params, |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut reviews = Vec::new();
    for row in rows {
        let (id, text, sentiment, created_at) = row?;
        let sentiment = sentiment
            .parse::<Sentiment>()
            .map_err(|_| StorageError::InvalidSentiment { id, value: sentiment })?;
        reviews.push(Review {
            id,
            text,
            sentiment,
            created_at,
        });
    }
    Ok(reviews)
}
