//! Filesystem abstraction for dependency injection in the validator.
//!
//! This module provides a `FileSystem` trait that abstracts filesystem
//! operations, enabling the validator and symbol extractor to be tested
//! without real filesystem access.
//!
//! ## Usage
//!
//! Production code uses `RealFileSystem`, which delegates to the actual
//! filesystem with error-tolerant UTF-8 decoding:
//!
//! ```ignore
//! let fs = RealFileSystem;
//! let content = fs.read_file(Path::new("src/foo.py"))?;
//! ```
//!
//! Test code can use `MockFileSystem` to simulate filesystem state without
//! touching disk.

use crate::error::{ScoutError, ScoutResult};
use std::io;
use std::path::{Path, PathBuf};

/// Trait abstracting filesystem operations needed by the validator and
/// symbol extractor.
///
/// `read_file` never fails on invalid UTF-8 -- it decodes lossily, replacing
/// invalid byte sequences, per the validator's I/O-safety contract. It does
/// fail (returning [`ScoutError::FileRead`]) on an `OSError`-equivalent: the
/// path does not exist, is a directory, or permissions deny the read.
pub trait FileSystem: Send + Sync + std::fmt::Debug {
    /// Read the contents of a file as a UTF-8 string, replacing invalid
    /// byte sequences rather than failing.
    fn read_file(&self, path: &Path) -> ScoutResult<String>;

    /// Check if a path exists (file, directory, or symlink to either).
    fn exists(&self, path: &Path) -> bool;

    /// Read the immediate target of a symlink without following it
    /// transitively. Returns `None` if `path` is not a symlink.
    fn read_link(&self, path: &Path) -> Option<PathBuf>;

    /// Check if a path is a symlink (without following it).
    fn is_symlink(&self, path: &Path) -> bool;

    /// List the entries of a directory (file names only, not full paths).
    /// Returns an empty vector if the directory cannot be read.
    fn read_dir(&self, path: &Path) -> Vec<String>;

    /// Check if a path is a regular file (after following symlinks).
    fn is_file(&self, path: &Path) -> bool;

    /// Check if a path is a directory (after following symlinks).
    fn is_dir(&self, path: &Path) -> bool;
}

/// Real filesystem implementation delegating to `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_file(&self, path: &Path) -> ScoutResult<String> {
        let bytes = std::fs::read(path).map_err(|source| ScoutError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn exists(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok()
    }

    fn read_link(&self, path: &Path) -> Option<PathBuf> {
        std::fs::read_link(path).ok()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.symlink_metadata()
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    fn read_dir(&self, path: &Path) -> Vec<String> {
        std::fs::read_dir(path)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter_map(|e| e.file_name().into_string().ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn real_fs_reads_lossily() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.py");
        fs::write(&path, [b'x', 0xff, b'y']).unwrap();
        let content = RealFileSystem.read_file(&path).unwrap();
        assert!(content.starts_with('x'));
        assert!(content.ends_with('y'));
    }

    #[test]
    fn real_fs_exists_and_kinds() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("f.py");
        let dir = temp.path().join("d");
        fs::write(&file, "x").unwrap();
        fs::create_dir(&dir).unwrap();

        let real = RealFileSystem;
        assert!(real.exists(&file));
        assert!(real.is_file(&file));
        assert!(!real.is_dir(&file));
        assert!(real.is_dir(&dir));
        assert!(!real.exists(&temp.path().join("missing")));
    }

    #[cfg(unix)]
    #[test]
    fn real_fs_detects_symlink() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("target.py");
        let link = temp.path().join("link.py");
        fs::write(&target, "x").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let real = RealFileSystem;
        assert!(real.is_symlink(&link));
        assert_eq!(real.read_link(&link).unwrap(), target);
    }
}
