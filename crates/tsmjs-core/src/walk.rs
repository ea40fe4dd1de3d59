//! Recursive discovery of TypeScript sources.
//!
//! Entries are visited depth-first in the order the operating system lists
//! them; a subdirectory is exhausted before its later siblings are looked at.
//! Nothing is sorted.

use std::path::{Path, PathBuf};

use log::trace;
use walkdir::WalkDir;

use crate::error::WalkError;

/// Substring that marks a file name as a build input.
pub const SOURCE_MARKER: &str = ".ts";

/// Whether a file name selects the file for compilation.
///
/// This is a substring test, not an extension test: `app.tsx`, `app.ts.map`
/// and `notes.tsv` all match.
pub fn is_source_file(name: &str) -> bool {
    name.contains(SOURCE_MARKER)
}

/// Walk the tree under `root`, calling `visit` with the full path of every
/// regular file whose name passes [`is_source_file`].
///
/// Symbolic links are followed. The first traversal error (missing root,
/// unreadable directory, link cycle) aborts the walk; files visited before
/// it have already been handed to `visit`.
pub fn walk<F>(root: &Path, mut visit: F) -> Result<(), WalkError>
where
    F: FnMut(&Path),
{
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry?;
        let file_type = entry.file_type();

        if entry.depth() == 0 {
            if !file_type.is_dir() {
                return Err(WalkError::NotADirectory(root.to_path_buf()));
            }
            continue;
        }

        if !file_type.is_file() {
            continue;
        }

        if is_source_file(&entry.file_name().to_string_lossy()) {
            visit(entry.path());
        } else {
            trace!("skipping {}", entry.path().display());
        }
    }
    Ok(())
}

/// Collect every path [`walk`] would visit, in visit order.
pub fn collect(root: &Path) -> Result<Vec<PathBuf>, WalkError> {
    let mut files = Vec::new();
    walk(root, |path| files.push(path.to_path_buf()))?;
    Ok(files)
}
