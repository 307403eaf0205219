//! Document storage.
//!
//! Every workflow artifact is a whole-file markdown or JSON document. The
//! [`DocumentStore`] trait is the only way the engine touches the file system.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

/// Whole-file document access.
pub trait DocumentStore {
    /// Read a document. A missing file is `Ok(None)`.
    fn read(&self, path: &Path) -> io::Result<Option<String>>;

    /// Write a document, replacing any previous content.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Names of the entries directly inside `dir`, sorted. A missing directory
    /// lists as empty.
    fn list(&self, dir: &Path) -> io::Result<Vec<String>>;

    /// Create a directory and all of its parents.
    fn create_dir_all(&self, dir: &Path) -> io::Result<()>;

    /// Whether a file or directory exists.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;
}

/// File-system backed store with atomic writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl FsStore {
    /// Create a new store.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentStore for FsStore {
    fn read(&self, path: &Path) -> io::Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        write_file_atomic(path, content)?;
        tracing::info!(path = %path.display(), bytes = content.len(), "Wrote document");
        Ok(())
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<String>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(io::Error::other)?;
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();
        Ok(names)
    }

    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// Write a file via a sibling temp file and a rename.
fn write_file_atomic(path: &Path, content: &str) -> io::Result<()> {
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, content)?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsStore::new();
        assert_eq!(store.read(&temp_dir.path().join("nope.md")).unwrap(), None);
    }

    #[test]
    fn test_write_creates_parents_and_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsStore::new();
        let path = temp_dir.path().join("docs/cycles/01-setup/README.md");

        store.write(&path, "# Cycle 01").unwrap();

        assert_eq!(store.read(&path).unwrap().as_deref(), Some("# Cycle 01"));
        assert_eq!(store.list(path.parent().unwrap()).unwrap(), vec!["README.md"]);
    }

    #[test]
    fn test_write_replaces_content() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsStore::new();
        let path = temp_dir.path().join("WORKFLOW.md");

        store.write(&path, "first").unwrap();
        store.write(&path, "second").unwrap();

        assert_eq!(store.read(&path).unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_list_is_sorted_and_shallow() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsStore::new();
        fs::write(temp_dir.path().join("002-b.md"), "").unwrap();
        fs::write(temp_dir.path().join("001-a.md"), "").unwrap();
        fs::create_dir_all(temp_dir.path().join("sub/deeper")).unwrap();

        let names = store.list(temp_dir.path()).unwrap();
        assert_eq!(names, vec!["001-a.md", "002-b.md", "sub"]);
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsStore::new();
        assert!(store.list(&temp_dir.path().join("missing")).unwrap().is_empty());
        assert!(!store.exists(&temp_dir.path().join("missing")));
    }
}
