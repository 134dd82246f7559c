//! Snapshot archive codec — one ZIP holding one JSON entry per collection
//!
//! Entries are named `<collection>.json`. Anything else inside the container
//! (directories, other extensions) is carried but never applied on restore.

use std::io::{Cursor, Read, Write};

use thiserror::Error;
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

/// Extension marking a data entry
pub const DATA_EXTENSION: &str = "json";
/// MIME type used when uploading archives
pub const CONTENT_TYPE: &str = "application/zip";

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// One named payload inside an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub payload: Vec<u8>,
    pub is_dir: bool,
}

impl ArchiveEntry {
    /// Entry name for a collection
    pub fn file_name(collection: &str) -> String {
        format!("{collection}.{DATA_EXTENSION}")
    }

    /// Source collection of a data entry, `None` for non-data entries
    pub fn collection_name(&self) -> Option<&str> {
        if self.is_dir {
            return None;
        }
        self.name
            .strip_suffix(DATA_EXTENSION)
            .and_then(|stem| stem.strip_suffix('.'))
            .filter(|stem| !stem.is_empty())
    }
}

/// Ordered set of archive entries, kept in insertion (or listing) order
#[derive(Debug, Clone, Default)]
pub struct SnapshotArchive {
    entries: Vec<ArchiveEntry>,
}

impl SnapshotArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a collection's serialized document set as `<collection>.json`
    pub fn push_collection(&mut self, collection: &str, payload: Vec<u8>) {
        self.entries.push(ArchiveEntry {
            name: ArchiveEntry::file_name(collection),
            payload,
            is_dir: false,
        });
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ArchiveEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pack all entries into a single in-memory ZIP buffer
    pub fn to_bytes(&self) -> ArchiveResult<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut buf);
            let options: FileOptions<()> =
                FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

            for entry in &self.entries {
                if entry.is_dir {
                    zip.add_directory(entry.name.as_str(), options)?;
                } else {
                    zip.start_file(entry.name.as_str(), options)?;
                    zip.write_all(&entry.payload)?;
                }
            }
            zip.finish()?;
        }
        Ok(buf.into_inner())
    }

    /// Unpack a ZIP buffer. Every entry is read fully before returning, so a
    /// corrupt container fails here and nothing downstream sees partial data.
    pub fn from_bytes(bytes: &[u8]) -> ArchiveResult<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();
            let is_dir = file.is_dir();
            let mut payload = Vec::new();
            if !is_dir {
                file.read_to_end(&mut payload)?;
            }
            entries.push(ArchiveEntry {
                name,
                payload,
                is_dir,
            });
        }

        Ok(Self { entries })
    }
}
