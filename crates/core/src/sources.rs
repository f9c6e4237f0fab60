//! Source tree walker
//!
//! Collects files by name suffix for reporting.

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{CoreError, Result};

/// Recursively collect absolute paths of regular files under `root` whose
/// name ends with `suffix`. Symlinks are followed, so a linked file or
/// directory is reported through its path under `root`. Results are sorted.
pub fn collect_files_with_suffix(root: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let root = std::fs::canonicalize(root)?;
    debug!("Walking {:?} for *{}", root, suffix);

    let mut files = Vec::new();
    for entry in WalkDir::new(&root).follow_links(true) {
        let entry = entry.map_err(|source| CoreError::Walk {
            path: root.clone(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .map(|name| name.ends_with(suffix))
            .unwrap_or(false);
        if matches {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}
