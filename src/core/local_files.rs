use std::fs::{self, Permissions};
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};

/// What the rewriter needs to know about an entry before touching it.
#[derive(Debug, Clone)]
pub struct Stat {
    pub is_dir: bool,
    pub permissions: Permissions,
}

/// File system operations used by the rewriter.
///
/// Errors are per-entry `Error::entry_io` values so the caller can report
/// them and move on. `read` fails with `ErrorCode::ContentNotText` for content
/// that is not valid UTF-8.
pub trait FileSystem {
    fn stat(&self, path: &Path) -> Result<Stat>;
    fn read(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, content: &str, permissions: &Permissions) -> Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
}

/// Local filesystem implementation
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for LocalFs {
    fn stat(&self, path: &Path) -> Result<Stat> {
        let metadata =
            fs::symlink_metadata(path).map_err(|e| Error::entry_io("stat", display(path), e))?;
        Ok(Stat {
            is_dir: metadata.is_dir(),
            permissions: metadata.permissions(),
        })
    }

    fn read(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| Error::entry_io("read", display(path), e))?;
        String::from_utf8(bytes)
            .map_err(|e| Error::content_not_text(display(path), e.utf8_error()))
    }

    fn write(&self, path: &Path, content: &str, permissions: &Permissions) -> Result<()> {
        // Atomic write: write to a sibling temp file, then rename over the original
        let parent = path
            .parent()
            .ok_or_else(|| Error::entry_io("write", display(path), "path has no parent"))?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)
            .map_err(|e| Error::entry_io("write", display(path), e))?;

        tmp.write_all(content.as_bytes())
            .map_err(|e| Error::entry_io("write", display(path), e))?;

        fs::set_permissions(tmp.path(), permissions.clone())
            .map_err(|e| Error::entry_io("write", display(path), e))?;

        tmp.persist(path)
            .map_err(|e| Error::entry_io("write", display(path), e.error))?;

        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        if fs::symlink_metadata(to).is_ok() {
            return Err(Error::entry_io(
                "move",
                display(from),
                format!("target already exists: {}", to.display()),
            ));
        }

        fs::rename(from, to).map_err(|e| Error::entry_io("move", display(from), e))
    }
}

/// Convenience function to get local filesystem
pub fn local() -> LocalFs {
    LocalFs::new()
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
