//! Queue Store: the persisted deletion queue file
//!
//! The file location is fixed at startup and never derived from request input.
//! Every commit re-resolves it through the canonical parent directory and
//! refuses to write when the file on disk resolves somewhere else (symlink
//! tamper).
//!
//! # Locking
//!
//! Writers hold an exclusive advisory lock across truncate + write + flush.
//! Readers going through [`QueueStore::load`] hold a shared lock, so they see
//! either the previous or the new array, never a truncated file. The lock is
//! an OS file lock and therefore also excludes other server processes.

use serde_json::Value;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Queue Store errors
///
/// Display strings include filesystem paths; they are for server logs only.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Configured path has no file name component
    #[error("Queue file path has no file name: {0}")]
    InvalidPath(PathBuf),

    /// Parent directory could not be canonicalized
    #[error("Failed to resolve queue directory {path}: {source}")]
    ResolveDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File on disk resolves to a different location than configured
    #[error("Queue file path verification failed: configured {configured}, resolved {resolved}")]
    PathSafety { configured: PathBuf, resolved: PathBuf },

    /// Open/create/read/write failure
    #[error("Queue file I/O failed: {0}")]
    Io(#[from] io::Error),

    /// Advisory lock could not be acquired or released
    #[error("Queue file lock failed: {0}")]
    Lock(#[source] io::Error),

    /// Queue could not be serialized
    #[error("Queue encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Stored content is not a JSON array
    #[error("Queue file content is not a JSON array: {0}")]
    Corrupt(#[source] serde_json::Error),
}

/// Handle on the deletion queue file
#[derive(Debug, Clone)]
pub struct QueueStore {
    path: PathBuf,
}

impl QueueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Configured queue file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve the path that commits write to
    ///
    /// The parent directory must exist. The returned path is
    /// `canonical(parent)/file_name`; an existing file (or symlink) at the
    /// configured location must resolve to exactly that path.
    pub fn resolve_target(&self) -> Result<PathBuf, StoreError> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| StoreError::InvalidPath(self.path.clone()))?;
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let base_dir = fs::canonicalize(parent).map_err(|source| StoreError::ResolveDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
        let secure_path = base_dir.join(file_name);

        match fs::canonicalize(&self.path) {
            Ok(resolved) if resolved == secure_path => Ok(secure_path),
            Ok(resolved) => Err(StoreError::PathSafety {
                configured: self.path.clone(),
                resolved,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                // A dangling symlink canonicalizes as NotFound but still exists
                if fs::symlink_metadata(&secure_path).is_ok() {
                    return Err(StoreError::PathSafety {
                        configured: self.path.clone(),
                        resolved: fs::read_link(&secure_path).unwrap_or(secure_path),
                    });
                }
                Ok(secure_path)
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Replace the stored queue with `queue`
    ///
    /// Creates the file with `[]` first when missing. Blocks until the
    /// exclusive lock is granted; callers on an async runtime must run this on
    /// the blocking pool.
    pub fn commit(&self, queue: &[Value]) -> Result<(), StoreError> {
        let target = self.resolve_target()?;
        create_if_missing(&target)?;

        let body = serde_json::to_string_pretty(queue).map_err(StoreError::Encode)?;

        let mut file = OpenOptions::new().read(true).write(true).open(&target)?;
        file.lock().map_err(StoreError::Lock)?;
        let written = replace_contents(&mut file, body.as_bytes());
        let released = file.unlock().map_err(StoreError::Lock);
        written?;
        released?;

        debug!(items = queue.len(), path = %target.display(), "Queue file committed");
        Ok(())
    }

    /// Read the stored queue; an absent or never-written file is `[]`
    pub fn load(&self) -> Result<Vec<Value>, StoreError> {
        let target = self.resolve_target()?;
        let mut file = match File::open(&target) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };

        file.lock_shared().map_err(StoreError::Lock)?;
        let mut content = String::new();
        let read = file.read_to_string(&mut content);
        let released = file.unlock().map_err(StoreError::Lock);
        read?;
        released?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(StoreError::Corrupt)
    }
}

/// Create `target` holding `[]` unless something already exists there
fn create_if_missing(target: &Path) -> Result<(), StoreError> {
    match OpenOptions::new().write(true).create_new(true).open(target) {
        Ok(mut file) => {
            file.lock().map_err(StoreError::Lock)?;
            let written = replace_contents(&mut file, b"[]");
            let released = file.unlock().map_err(StoreError::Lock);
            written?;
            released?;
            info!("Created queue file {}", target.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(StoreError::Io(e)),
    }
}

/// Truncate, write and flush to disk. Caller holds the exclusive lock.
fn replace_contents(file: &mut File, body: &[u8]) -> io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(body)?;
    file.flush()?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> QueueStore {
        QueueStore::new(dir.path().join("delete_requests.json"))
    }

    #[test]
    fn test_load_absent_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists(), "load must not create the file");
    }

    #[test]
    fn test_commit_creates_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.commit(&[json!({"id": "a", "filename": "a.jpg"})]).unwrap();

        let stored: Vec<Value> =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(stored, vec![json!({"id": "a", "filename": "a.jpg"})]);
    }

    #[test]
    fn test_commit_is_full_replacement() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.commit(&[json!({"id": "a", "filename": "a.jpg"})]).unwrap();
        store.commit(&[json!({"id": "b", "filename": "b.jpg"})]).unwrap();

        assert_eq!(store.load().unwrap(), vec![json!({"id": "b", "filename": "b.jpg"})]);
    }

    #[test]
    fn test_commit_shorter_queue_leaves_no_trailing_bytes() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let long: Vec<Value> = (0..50)
            .map(|i| json!({"id": i.to_string(), "filename": format!("{}.jpg", i)}))
            .collect();
        store.commit(&long).unwrap();
        store.commit(&[]).unwrap();

        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
    }

    #[test]
    fn test_commit_pretty_prints_and_keeps_unicode() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.commit(&[json!({"id": "写真", "filename": "夏.jpg"})]).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("夏.jpg"), "non-ASCII must not be escaped: {}", raw);
        assert!(raw.contains('\n'), "output must be pretty-printed: {}", raw);
    }

    #[test]
    fn test_missing_directory_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = QueueStore::new(dir.path().join("missing").join("delete_requests.json"));
        let err = store.commit(&[]).unwrap_err();
        assert!(matches!(err, StoreError::ResolveDirectory { .. }), "{:?}", err);
    }

    #[test]
    fn test_load_rejects_non_array_content() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"{"not":"an array"}"#).unwrap();
        assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_queue_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let elsewhere = dir.path().join("elsewhere.json");
        fs::write(&elsewhere, "[]").unwrap();
        let store = store_in(&dir);
        std::os::unix::fs::symlink(&elsewhere, store.path()).unwrap();

        let err = store.commit(&[json!({"id": "a", "filename": "a.jpg"})]).unwrap_err();
        assert!(matches!(err, StoreError::PathSafety { .. }), "{:?}", err);
        assert_eq!(fs::read_to_string(&elsewhere).unwrap(), "[]");
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::os::unix::fs::symlink(dir.path().join("nowhere.json"), store.path()).unwrap();

        let err = store.commit(&[]).unwrap_err();
        assert!(matches!(err, StoreError::PathSafety { .. }), "{:?}", err);
        assert!(!dir.path().join("nowhere.json").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_resolves_to_canonical_path() {
        let dir = TempDir::new().unwrap();
        let real_dir = dir.path().join("real");
        fs::create_dir(&real_dir).unwrap();
        let link_dir = dir.path().join("link");
        std::os::unix::fs::symlink(&real_dir, &link_dir).unwrap();

        let store = QueueStore::new(link_dir.join("delete_requests.json"));
        let target = store.resolve_target().unwrap();
        assert_eq!(target, fs::canonicalize(&real_dir).unwrap().join("delete_requests.json"));

        store.commit(&[json!({"id": "a", "filename": "a.jpg"})]).unwrap();
        assert!(real_dir.join("delete_requests.json").exists());
    }
}
