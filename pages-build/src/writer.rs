//! Output directory handling and page writes.
//!
//! ## `write_page` protocol
//!
//! 1. Write the content, byte for byte, to `<path>.pages.tmp`.
//! 2. Rename over the final path (atomic on POSIX), removing the temp file
//!    if the rename fails.
//!
//! Parent directories are the caller's job: see [`ensure_dir`].

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{io_err, BuildError};

/// Make sure `dir` exists as a directory, creating missing ancestors.
///
/// Fails with [`BuildError::NotADirectory`] if `dir`, or the nearest ancestor
/// of it that exists, is not a directory. Nothing is created in that case.
pub(crate) fn ensure_dir(dir: &Path) -> Result<(), BuildError> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    let existing = dir.ancestors().find(|a| !a.as_os_str().is_empty() && a.exists());
    if let Some(ancestor) = existing {
        if !ancestor.is_dir() {
            return Err(BuildError::NotADirectory {
                path: ancestor.to_path_buf(),
            });
        }
        if ancestor == dir {
            return Ok(());
        }
    }
    debug!("creating directory: {}", dir.display());
    fs::create_dir_all(dir).map_err(|e| io_err(dir, e))
}

/// Write `content` to `path`, replacing any existing file.
pub(crate) fn write_page(path: &Path, content: &str) -> Result<(), BuildError> {
    let tmp = PathBuf::from(format!("{}.pages.tmp", path.display()));
    write_page_with_tmp(path, content, &tmp)
}

fn write_page_with_tmp(path: &Path, content: &str, tmp: &Path) -> Result<(), BuildError> {
    fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = fs::rename(tmp, path) {
        let _ = fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn ensure_dir_creates_missing_chain() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("a").join("b").join("c");
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("out");
        ensure_dir(&dir).unwrap();
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn ensure_dir_rejects_file() {
        let root = TempDir::new().unwrap();
        let file = root.path().join("blog");
        fs::write(&file, "not a dir").unwrap();

        let err = ensure_dir(&file).unwrap_err();
        assert!(matches!(err, BuildError::NotADirectory { ref path } if *path == file));
    }

    #[test]
    fn ensure_dir_rejects_file_ancestor_without_creating_anything() {
        let root = TempDir::new().unwrap();
        let file = root.path().join("blog");
        fs::write(&file, "not a dir").unwrap();

        let err = ensure_dir(&file.join("2024").join("05")).unwrap_err();
        assert!(matches!(err, BuildError::NotADirectory { ref path } if *path == file));
        assert_eq!(fs::read_to_string(&file).unwrap(), "not a dir");
    }

    #[test]
    fn ensure_dir_accepts_empty_path() {
        ensure_dir(Path::new("")).unwrap();
    }

    #[test]
    fn write_page_overwrites_and_cleans_tmp() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("index.html");
        fs::write(&path, "old").unwrap();

        write_page(&path, "new\r\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new\r\n", "content is written as given");
        let tmp = PathBuf::from(format!("{}.pages.tmp", path.display()));
        assert!(!tmp.exists(), ".pages.tmp must be cleaned up");
    }

    #[test]
    fn rename_failure_leaves_original_and_cleans_tmp() {
        let root = TempDir::new().unwrap();
        // A non-empty directory at the target path makes the rename fail,
        // whatever the process privileges.
        let path = root.path().join("index.html");
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("keep.txt"), "original").unwrap();

        let tmp_path = root.path().join("index.html.pages.tmp");
        let err = write_page_with_tmp(&path, "new content", &tmp_path)
            .expect_err("rename onto a non-empty directory should fail");

        assert!(matches!(err, BuildError::Io { path: ref p, .. } if *p == path), "got: {err}");
        assert_eq!(fs::read_to_string(path.join("keep.txt")).unwrap(), "original");
        assert!(!tmp_path.exists(), ".pages.tmp should be cleaned up");
    }
}
