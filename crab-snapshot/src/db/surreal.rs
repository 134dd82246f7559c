//! SurrealDB-backed document store
//!
//! Collections map to tables. Record ids are flattened to their key on read
//! so documents serialize as plain JSON, and re-inserting a document with the
//! same `id` recreates the same record.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};
use surrealdb::opt::auth::Root;

use super::{Connector, DbError, DbResult, DocumentStore};
use crate::Document;
use crate::config::Config;

/// Quote a table name as a SurrealQL identifier
fn table_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "\\`"))
}

pub struct SurrealStore {
    client: Mutex<Option<Surreal<Any>>>,
}

impl SurrealStore {
    pub fn new(db: Surreal<Any>) -> Self {
        Self {
            client: Mutex::new(Some(db)),
        }
    }

    fn db(&self) -> DbResult<Surreal<Any>> {
        self.client.lock().clone().ok_or(DbError::Closed)
    }
}

#[async_trait]
impl DocumentStore for SurrealStore {
    async fn list_collections(&self) -> DbResult<Vec<String>> {
        let info: Option<serde_json::Value> = self.db()?.query("INFO FOR DB").await?.take(0)?;

        let names = info
            .as_ref()
            .and_then(|v| v.get("tables"))
            .and_then(|t| t.as_object())
            .map(|tables| tables.keys().cloned().collect())
            .unwrap_or_default();
        Ok(names)
    }

    async fn read_collection(&self, collection: &str) -> DbResult<Vec<Document>> {
        let sql = format!(
            "SELECT *, record::id(id) AS id FROM {}",
            table_ident(collection)
        );
        let documents: Vec<Document> = self.db()?.query(sql).await?.take(0)?;
        Ok(documents)
    }

    async fn delete_all(&self, collection: &str) -> DbResult<()> {
        let sql = format!("DELETE {}", table_ident(collection));
        self.db()?.query(sql).await?.check()?;
        Ok(())
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> DbResult<usize> {
        let count = documents.len();
        let sql = format!("INSERT INTO {} $documents", table_ident(collection));
        self.db()?
            .query(sql)
            .bind(("documents", documents))
            .await?
            .check()?;
        Ok(count)
    }

    /// Delete + insert inside one transaction, so a failed insert leaves the
    /// previous contents in place.
    async fn replace_collection(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> DbResult<usize> {
        let count = documents.len();
        let table = table_ident(collection);
        let sql = format!(
            "BEGIN TRANSACTION;\n\
             DELETE {table};\n\
             INSERT INTO {table} $documents;\n\
             COMMIT TRANSACTION;"
        );
        self.db()?
            .query(sql)
            .bind(("documents", documents))
            .await?
            .check()?;
        Ok(count)
    }

    async fn close(&self) -> DbResult<()> {
        // Dropping the last handle tears down the underlying connection
        match self.client.lock().take() {
            Some(_) => Ok(()),
            None => Err(DbError::Closed),
        }
    }
}

/// Connects to SurrealDB with the configured namespace/database
#[derive(Debug, Clone)]
pub struct SurrealConnector {
    url: String,
    namespace: String,
    database: String,
    credentials: Option<(String, String)>,
}

impl SurrealConnector {
    pub fn new(config: &Config) -> Self {
        let credentials = match (&config.database_user, &config.database_pass) {
            (Some(user), Some(pass)) => Some((user.clone(), pass.clone())),
            _ => None,
        };
        Self {
            url: config.database_url.clone(),
            namespace: config.database_namespace.clone(),
            database: config.database_name.clone(),
            credentials,
        }
    }
}

#[async_trait]
impl Connector for SurrealConnector {
    async fn connect(&self) -> DbResult<Arc<dyn DocumentStore>> {
        let connect_err = |e: surrealdb::Error| DbError::Connect(e.to_string());

        let db = any::connect(self.url.as_str()).await.map_err(connect_err)?;

        if let Some((username, password)) = &self.credentials {
            db.signin(Root {
                username: username.as_str(),
                password: password.as_str(),
            })
                .await
                .map_err(connect_err)?;
        }

        db.use_ns(self.namespace.as_str())
            .use_db(self.database.as_str())
            .await
            .map_err(connect_err)?;

        tracing::info!(
            namespace = %self.namespace,
            database = %self.database,
            "Connected to SurrealDB"
        );
        Ok(Arc::new(SurrealStore::new(db)))
    }
}
