//! Document destinations.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::SinkError;

/// Handle to a document that was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenDocument {
    /// Destination name (a slug, without extension).
    pub name: String,
    /// Where the document lives.
    pub path: PathBuf,
    /// Number of bytes written.
    pub bytes: usize,
}

/// Append-or-create byte sink addressed by name.
///
/// Implementations must be usable from several worker threads at once;
/// the writer never hands the same name to two workers.
pub trait DocumentSink: Send + Sync {
    /// Write `bytes` to the destination `name`, creating it if needed and
    /// appending otherwise.
    fn write_document(&self, name: &str, bytes: &[u8]) -> Result<WrittenDocument, SinkError>;
}

/// Writes documents as files in one directory.
#[derive(Debug, Clone)]
pub struct FsSink {
    dir: PathBuf,
    extension: String,
}

impl FsSink {
    /// Sink writing `<dir>/<name>.<extension>`.
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Destination path for `name`.
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{}", self.extension))
    }
}

impl DocumentSink for FsSink {
    fn write_document(&self, name: &str, bytes: &[u8]) -> Result<WrittenDocument, SinkError> {
        fs::create_dir_all(&self.dir).map_err(|e| SinkError::new(&self.dir, e))?;

        let path = self.path_for(name);
        // The file is closed when it goes out of scope, on error paths too.
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| SinkError::new(&path, e))?;
        file.write_all(bytes).map_err(|e| SinkError::new(&path, e))?;
        file.flush().map_err(|e| SinkError::new(&path, e))?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Wrote document");

        Ok(WrittenDocument {
            name: name.to_owned(),
            path,
            bytes: bytes.len(),
        })
    }
}

/// Keeps documents in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    documents: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Document text by name, if written.
    #[must_use]
    pub fn document(&self, name: &str) -> Option<String> {
        self.lock()
            .get(name)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Names of every written document, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.documents.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DocumentSink for MemorySink {
    fn write_document(&self, name: &str, bytes: &[u8]) -> Result<WrittenDocument, SinkError> {
        self.lock()
            .entry(name.to_owned())
            .or_default()
            .extend_from_slice(bytes);

        Ok(WrittenDocument {
            name: name.to_owned(),
            path: PathBuf::from(name),
            bytes: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_fs_sink_creates_directory_and_file() {
        let temp = TempDir::new().unwrap();
        let sink = FsSink::new(temp.path().join("out"), "puml");

        let written = sink.write_document("App_Widget", b"class Widget").unwrap();

        assert_eq!(written.path, temp.path().join("out/App_Widget.puml"));
        assert_eq!(written.bytes, 12);
        assert_eq!(fs::read_to_string(&written.path).unwrap(), "class Widget");
    }

    #[test]
    fn test_fs_sink_appends() {
        let temp = TempDir::new().unwrap();
        let sink = FsSink::new(temp.path(), "puml");

        sink.write_document("doc", b"first").unwrap();
        sink.write_document("doc", b"second").unwrap();

        assert_eq!(
            fs::read_to_string(sink.path_for("doc")).unwrap(),
            "firstsecond"
        );
    }

    #[test]
    fn test_fs_sink_reports_path_on_failure() {
        let temp = TempDir::new().unwrap();
        // A regular file where the output directory should be.
        let blocker = temp.path().join("blocked");
        fs::write(&blocker, "").unwrap();
        let sink = FsSink::new(&blocker, "puml");

        let err = sink.write_document("doc", b"text").unwrap_err();
        assert_eq!(err.path, blocker);
    }

    #[test]
    fn test_memory_sink() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.write_document("b", b"two").unwrap();
        sink.write_document("a", b"one").unwrap();
        sink.write_document("a", b"!").unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.names(), vec!["a", "b"]);
        assert_eq!(sink.document("a").as_deref(), Some("one!"));
        assert_eq!(sink.document("missing"), None);
    }
}
