// In-memory stand-ins for the database, object store and notifier
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crab_snapshot::Document;
use crab_snapshot::db::{Connector, DbError, DbResult, DocumentStore};
use crab_snapshot::notify::{Notifier, NotifyError};
use crab_snapshot::storage::{
    ListingEntry, ListingPage, ObjectStore, StorageError, StorageResult,
};
use parking_lot::Mutex;

// ── Database ──

#[derive(Default)]
pub struct MemoryDb {
    pub collections: Mutex<BTreeMap<String, Vec<Document>>>,
    pub fail_read: Mutex<Option<String>>,
    pub fail_insert: Mutex<Option<String>>,
    pub close_calls: AtomicUsize,
}

impl MemoryDb {
    pub fn with(collections: &[(&str, Vec<Document>)]) -> Arc<Self> {
        let db = Self::default();
        {
            let mut map = db.collections.lock();
            for (name, docs) in collections {
                map.insert(name.to_string(), docs.clone());
            }
        }
        Arc::new(db)
    }

    pub fn docs(&self, collection: &str) -> Vec<Document> {
        self.collections
            .lock()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_docs(&self, collection: &str, docs: Vec<Document>) {
        self.collections.lock().insert(collection.to_string(), docs);
    }

    pub fn closes(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryDb {
    async fn list_collections(&self) -> DbResult<Vec<String>> {
        Ok(self.collections.lock().keys().cloned().collect())
    }

    async fn read_collection(&self, collection: &str) -> DbResult<Vec<Document>> {
        if self.fail_read.lock().as_deref() == Some(collection) {
            return Err(DbError::Query(format!("read of {collection} refused")));
        }
        Ok(self.docs(collection))
    }

    async fn delete_all(&self, collection: &str) -> DbResult<()> {
        self.collections
            .lock()
            .insert(collection.to_string(), Vec::new());
        Ok(())
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> DbResult<usize> {
        if self.fail_insert.lock().as_deref() == Some(collection) {
            return Err(DbError::Query(format!("insert into {collection} refused")));
        }
        let count = documents.len();
        self.collections
            .lock()
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
        Ok(count)
    }

    async fn close(&self) -> DbResult<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct MemoryConnector {
    pub db: Arc<MemoryDb>,
    pub refuse: bool,
}

impl MemoryConnector {
    pub fn new(db: Arc<MemoryDb>) -> Arc<Self> {
        Arc::new(Self { db, refuse: false })
    }

    pub fn refusing(db: Arc<MemoryDb>) -> Arc<Self> {
        Arc::new(Self { db, refuse: true })
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self) -> DbResult<Arc<dyn DocumentStore>> {
        if self.refuse {
            return Err(DbError::Connect("connection refused".into()));
        }
        Ok(self.db.clone())
    }
}

// ── Object storage ──

pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
    pub last_modified: DateTime<Utc>,
}

pub struct MemoryObjects {
    pub bucket: String,
    pub objects: Mutex<BTreeMap<String, StoredObject>>,
    pub page_size: usize,
    pub fail_put: bool,
    pub list_calls: AtomicUsize,
}

impl MemoryObjects {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::with_page_size(1000))
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            bucket: "crab-backups".into(),
            objects: Mutex::new(BTreeMap::new()),
            page_size,
            fail_put: false,
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_put() -> Arc<Self> {
        Arc::new(Self {
            fail_put: true,
            ..Self::with_page_size(1000)
        })
    }

    pub fn insert(&self, key: &str, body: Vec<u8>, last_modified_secs: i64) {
        self.objects.lock().insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: "application/zip".into(),
                last_modified: DateTime::from_timestamp(last_modified_secs, 0).unwrap(),
            },
        );
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().keys().cloned().collect()
    }

    pub fn body(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().get(key).map(|o| o.body.clone())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjects {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        if self.fail_put {
            return Err(StorageError::Put {
                key: key.to_string(),
                message: "AccessDenied".into(),
            });
        }
        self.objects.lock().insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
                last_modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn list_page(&self, continuation: Option<String>) -> StorageResult<ListingPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let start: usize = continuation
            .map(|t| t.parse::<usize>().map_err(|_| StorageError::List("bad token".into())))
            .transpose()?
            .unwrap_or(0);

        let objects = self.objects.lock();
        let entries: Vec<ListingEntry> = objects
            .iter()
            .skip(start)
            .take(self.page_size)
            .map(|(key, o)| ListingEntry {
                key: key.clone(),
                last_modified: o.last_modified,
            })
            .collect();
        let end = start + entries.len();
        let next_token = (end < objects.len()).then(|| end.to_string());

        Ok(ListingPage {
            entries,
            next_token,
        })
    }

    async fn get_object(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.body(key).ok_or_else(|| StorageError::Get {
            key: key.to_string(),
            message: "NoSuchKey".into(),
        })
    }
}

// ── Notifications ──

#[derive(Default)]
pub struct CapturingNotifier {
    pub messages: Mutex<Vec<String>>,
    pub fail: bool,
}

impl CapturingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

#[async_trait]
impl Notifier for CapturingNotifier {
    async fn notify(&self, text: &str) -> Result<(), NotifyError> {
        self.messages.lock().push(text.to_string());
        if self.fail {
            // Any reqwest error will do; build one from an invalid URL
            let err = reqwest::Client::new()
                .get("not a url")
                .build()
                .expect_err("invalid URL must fail");
            return Err(NotifyError::Transport(err));
        }
        Ok(())
    }
}
