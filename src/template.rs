//! Template selection over a downloaded repository archive.
//!
//! Hosting APIs wrap every zipball entry in one synthetic top-level folder
//! (`<repo>-<commit>/`). A template is a folder directly below that wrapper;
//! selecting it extracts its subtree with the wrapper component dropped, so
//! the template folder itself lands in the destination root.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::archive::{ZipExtractor, create_dir};
use crate::error::Result;
use crate::io::LocalFileReader;

/// Selector value meaning "extract the whole archive, wrapper included"
pub const EXTRACT_ALL: &str = ".";

/// Which part of the archive to extract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    All,
    Folder(String),
}

impl Selector {
    pub fn parse(template: &str) -> Self {
        if template == EXTRACT_ALL {
            Selector::All
        } else {
            Selector::Folder(template.to_string())
        }
    }

    /// Map an archive entry name to its path relative to the destination,
    /// or `None` when the entry is not selected.
    pub fn target_path(&self, entry_name: &str) -> Option<PathBuf> {
        match self {
            Selector::All => Some(PathBuf::from(entry_name)),
            Selector::Folder(name) => {
                let segments: Vec<&str> = entry_name.split('/').collect();
                if segments.len() > 1 && segments[1] == name {
                    Some(segments[1..].iter().filter(|s| !s.is_empty()).collect())
                } else {
                    None
                }
            }
        }
    }
}

/// Counts of what an extraction wrote
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractSummary {
    pub directories: usize,
    pub files: usize,
}

impl ExtractSummary {
    pub fn is_empty(&self) -> bool {
        self.directories == 0 && self.files == 0
    }
}

/// Only plain relative components may be joined onto the destination.
fn is_enclosed(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_)))
}

/// Extract the entries of `archive_path` chosen by `selector` under `dest`.
///
/// Entries are processed in archive order and the first failure aborts the
/// rest; files written before it stay on disk. Existing files are
/// overwritten. A selector that matches nothing is not an error.
pub async fn extract_template(
    archive_path: &Path,
    selector: &Selector,
    dest: &Path,
) -> Result<ExtractSummary> {
    let reader = Arc::new(LocalFileReader::new(archive_path)?);
    let extractor = ZipExtractor::new(reader);
    let entries = extractor.list_files().await?;

    let mut summary = ExtractSummary::default();
    for entry in &entries {
        let Some(relative) = selector.target_path(&entry.file_name) else {
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }
        if !is_enclosed(&relative) {
            log::warn!("skipping unsafe entry path: {}", entry.file_name);
            continue;
        }

        let target = dest.join(&relative);
        if entry.is_directory {
            log::debug!("creating {}", target.display());
            create_dir(&target).await?;
            summary.directories += 1;
        } else {
            log::debug!("extracting {}", target.display());
            extractor.extract_to_file(entry, &target).await?;
            summary.files += 1;
        }
    }

    if summary.is_empty() {
        log::info!("no entries matched {selector:?}");
    }

    Ok(summary)
}
