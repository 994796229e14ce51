//! Tree walker: depth-first, pre-order listing of everything under a root.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::Error;
use crate::filter::Exclude;

/// A filesystem entry as seen during the walk.
///
/// The path is only valid until one of its ancestors is renamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Entries in traversal order plus the entries that could not be read.
#[derive(Debug, Default)]
pub struct WalkResult {
    pub entries: Vec<Entry>,
    pub errors: Vec<Error>,
}

/// List everything under `root` (but not `root` itself) in pre-order.
///
/// Excluded directories are pruned, excluded files are skipped. Symbolic
/// links are neither followed nor listed. Children are visited in file-name
/// order.
pub fn walk(root: &Path, exclude: &dyn Exclude) -> WalkResult {
    let mut result = WalkResult::default();
    let mut walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    while let Some(next) = walker.next() {
        let entry = match next {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(|p| relative_display(root, p))
                    .unwrap_or_else(|| root.display().to_string());
                result.errors.push(Error::walk_unreadable_metadata(path, err));
                continue;
            }
        };

        let is_dir = entry.file_type().is_dir();

        if exclude.is_excluded(entry.path()) {
            if is_dir {
                walker.skip_current_dir();
            }
            continue;
        }

        if entry.path_is_symlink() {
            continue;
        }

        match entry.metadata() {
            Ok(_) => result.entries.push(Entry {
                path: entry.into_path(),
                is_dir,
            }),
            Err(err) => {
                let path = relative_display(root, entry.path());
                result.errors.push(Error::walk_unreadable_metadata(path, err));
                if is_dir {
                    walker.skip_current_dir();
                }
            }
        }
    }

    result
}

fn relative_display(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
