//! Document database seam
//!
//! The pipeline only needs four primitives from the live database: list
//! collection names, read a whole collection, delete a whole collection and
//! bulk insert. `replace_collection` composes the last two; stores that
//! support multi-statement transactions override it.

pub mod surreal;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::Document;

pub use surreal::{SurrealConnector, SurrealStore};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Connect error: {0}")]
    Connect(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Connection already closed")]
    Closed,
}

impl From<surrealdb::Error> for DbError {
    fn from(err: surrealdb::Error) -> Self {
        DbError::Query(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Names of every collection visible right now
    async fn list_collections(&self) -> DbResult<Vec<String>>;

    /// Full document set of one collection, read in a single query
    async fn read_collection(&self, collection: &str) -> DbResult<Vec<Document>>;

    /// Remove every document from a collection
    async fn delete_all(&self, collection: &str) -> DbResult<()>;

    /// Insert a document set into a collection
    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> DbResult<usize>;

    /// Replace a collection's contents. The default is delete-then-insert with
    /// no rollback: an insert failure leaves the collection empty.
    async fn replace_collection(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> DbResult<usize> {
        self.delete_all(collection).await?;
        self.insert_many(collection, documents).await
    }

    /// Release the connection. Called once per invocation.
    async fn close(&self) -> DbResult<()>;
}

/// Opens one database connection per invocation
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> DbResult<Arc<dyn DocumentStore>>;
}
