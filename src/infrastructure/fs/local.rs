//! Local File System Implementation
//!
//! Output writes for merged trees and blobs. Every failure is reported as
//! a `WriteFailure` carrying the target path.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::error::{MergeError, MergeResult};

/// Local file system output
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }

    /// Write `content` to `path` via a temp file in the same directory and
    /// a rename, creating parent directories as needed.
    pub fn write_atomic(&self, path: &Path, content: &[u8]) -> MergeResult<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| MergeError::write_failure(path, e))?;

        let mut temp = NamedTempFile::new_in(parent).map_err(|e| MergeError::write_failure(path, e))?;
        temp.write_all(content)
            .and_then(|_| temp.flush())
            .map_err(|e| MergeError::write_failure(path, e))?;
        temp.persist(path)
            .map_err(|e| MergeError::write_failure(path, e.error))?;
        Ok(())
    }

    /// Copy `source` to `target`. Returns `false` when the target already
    /// holds identical bytes and was left alone.
    pub fn copy_file(&self, source: &Path, target: &Path) -> MergeResult<bool> {
        let content = fs::read(source).map_err(|e| MergeError::write_failure(target, e))?;
        if target.is_file() {
            if let Ok(existing) = self.hash_file(target) {
                if existing == hash_bytes(&content) {
                    return Ok(false);
                }
            }
        }
        self.write_atomic(target, &content)?;
        Ok(true)
    }

    /// Delete `path`; a missing file is not an error. Empty parent
    /// directories up to `stop_at` are removed too.
    pub fn remove_file(&self, path: &Path, stop_at: &Path) -> MergeResult<bool> {
        match fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(MergeError::write_failure(path, e)),
        }
        let mut dir = path.parent();
        while let Some(current) = dir {
            if current == stop_at || !current.starts_with(stop_at) {
                break;
            }
            if fs::remove_dir(current).is_err() {
                break;
            }
            dir = current.parent();
        }
        Ok(true)
    }

    /// Remove a directory tree; a missing directory is not an error.
    pub fn remove_dir_all(&self, path: &Path) -> MergeResult<()> {
        match fs::remove_dir_all(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MergeError::write_failure(path, e)),
        }
    }

    /// `sha256:<hex>` of a file's content.
    pub fn hash_file(&self, path: &Path) -> io::Result<String> {
        let mut file = fs::File::open(path)?;
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; 8192];
        loop {
            let read = file.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }
        Ok(format!("sha256:{:x}", hasher.finalize()))
    }
}

pub fn hash_bytes(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("sha256:{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_atomic_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("nested").join("dir").join("out.txt");

        LocalFs::new().write_atomic(&file, b"content").unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "content");
    }

    #[test]
    fn write_atomic_overwrites() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("out.txt");
        fs::write(&file, "original").unwrap();

        LocalFs::new().write_atomic(&file, b"replaced").unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "replaced");
    }

    #[test]
    fn copy_skips_identical_targets() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.png");
        let target = dir.path().join("out").join("a.png");
        fs::write(&source, b"\x89PNG").unwrap();
        let local = LocalFs::new();

        assert!(local.copy_file(&source, &target).unwrap());
        assert!(!local.copy_file(&source, &target).unwrap());

        fs::write(&source, b"\x89PNG2").unwrap();
        assert!(local.copy_file(&source, &target).unwrap());
        assert_eq!(fs::read(&target).unwrap(), b"\x89PNG2");
    }

    #[test]
    fn copy_of_missing_source_is_write_failure() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out.png");
        let err = LocalFs::new()
            .copy_file(&dir.path().join("missing.png"), &target)
            .unwrap_err();
        match err {
            MergeError::WriteFailure { path, .. } => assert_eq!(path, target),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn remove_file_prunes_empty_parents() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("out");
        let file = root.join("drawable").join("icon.png");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, b"x").unwrap();
        let local = LocalFs::new();

        assert!(local.remove_file(&file, &root).unwrap());
        assert!(!root.join("drawable").exists());
        assert!(root.exists());
        assert!(!local.remove_file(&file, &root).unwrap());
    }

    #[test]
    fn hash_matches_byte_hash() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("hash.txt");
        fs::write(&file, "hello").unwrap();

        let hash = LocalFs::new().hash_file(&file).unwrap();

        assert_eq!(hash, hash_bytes(b"hello"));
        assert_eq!(hash.len(), 7 + 64);
    }
}
