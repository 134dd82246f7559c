//! crab-snapshot — point-in-time logical backup and restore
//!
//! Backup path: enumerate collections → serialize each to JSON → pack into
//! one ZIP archive → upload under a timestamp key.
//!
//! Restore path: locate the newest archive → download → unpack → replace each
//! archived collection's contents.
//!
//! Both paths report their terminal outcome through a [`notify::Notifier`].

pub mod archive;
pub mod backup;
pub mod config;
pub mod db;
pub mod error;
pub mod locator;
pub mod notify;
pub mod pipeline;
pub mod report;
pub mod restore;
pub mod storage;

pub use config::Config;
pub use error::{SnapshotError, SnapshotResult};
pub use pipeline::SnapshotPipeline;
pub use report::{InvocationResponse, ResponseBody};

/// Opaque document. The pipeline never inspects document fields.
pub type Document = serde_json::Value;
