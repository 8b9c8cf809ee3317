//! Access to the files named by `include` statements.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

/// A source of script files.
///
/// The interpreter resolves the path of an included file itself, trying each candidate
/// directory in order, and asks the file system for the contents of each candidate.
pub trait FileSystem {
    /// Reads the file at the given path, returning [`None`] if it does not exist or cannot be
    /// read.
    fn read_file(&self, path: &Path) -> Option<String>;
}

/// Reads files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read_file(&self, path: &Path) -> Option<String> {
        fs::read_to_string(path).ok()
    }
}

/// An in-memory file system, used to run scripts that include each other without touching the
/// disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: HashMap<PathBuf, String>,
}

impl MemoryFileSystem {
    /// Creates an empty file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, replacing any file at the same path.
    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> &mut Self {
        self.files.insert(path.into(), contents.into());
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_file(&self, path: &Path) -> Option<String> {
        self.files.get(path).cloned()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn memory_lookup_is_exact() {
        let mut fs = MemoryFileSystem::new();
        fs.insert("lib/rules.sym", "[r] define a -> b; end");

        assert_eq!(fs.read_file(Path::new("lib/rules.sym")).as_deref(), Some("[r] define a -> b; end"));
        assert_eq!(fs.read_file(Path::new("rules.sym")), None);
    }

    #[test]
    fn missing_file_on_disk() {
        assert_eq!(OsFileSystem.read_file(Path::new("this/file/does/not/exist.sym")), None);
    }
}
