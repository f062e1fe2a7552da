use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// The downloaded archive on disk, removed when dropped.
///
/// Create the guard before the download starts so that a partially written
/// file is cleaned up along with a complete one.
pub struct TempArchive {
    path: PathBuf,
}

impl TempArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempArchive {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::debug!("removed {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => log::warn!("failed to remove {}: {e}", self.path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_file_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repo.zip");

        {
            let archive = TempArchive::new(&path);
            std::fs::write(archive.path(), b"PK").unwrap();
            assert!(path.exists());
        }

        assert!(!path.exists());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        drop(TempArchive::new(dir.path().join("repo.zip")));
    }
}
