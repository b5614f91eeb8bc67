//! Filesystem access used to load schema files.

use std::io;
use std::path::Path;

/// Read-only view of a filesystem holding schema files.
pub trait SchemaFileSystem {
    /// Whether a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Read the full text content of the file at `path`.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Local filesystem backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl SchemaFileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}
