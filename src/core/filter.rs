//! Path exclusion: built-in version-control and OS artifacts plus a
//! project-local ignore file.

use glob_match::glob_match;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Name of the project-local ignore file, read from the root directory.
pub const IGNORE_FILE: &str = ".retreeignore";

/// Version-control metadata directories, excluded at any depth.
const VCS_DIRS: &[&str] = &[".git", ".hg", ".svn", ".bzr", "_darcs", "CVS"];

/// Operating-system artifact files, excluded at any depth.
const OS_ARTIFACTS: &[&str] = &[".DS_Store", "Thumbs.db", "desktop.ini"];

/// Decides whether a visited path is left out of the walk.
pub trait Exclude {
    fn is_excluded(&self, path: &Path) -> bool;
}

impl<F> Exclude for F
where
    F: Fn(&Path) -> bool,
{
    fn is_excluded(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Built-in exclusions plus glob patterns from the ignore file.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    root: PathBuf,
    patterns: Vec<String>,
}

impl Filter {
    /// Built-in exclusions only.
    pub fn new(root: &Path) -> Self {
        Filter {
            root: root.to_path_buf(),
            patterns: Vec::new(),
        }
    }

    /// Built-in exclusions plus `<root>/.retreeignore` when it exists.
    pub fn load(root: &Path) -> Result<Self> {
        let mut filter = Filter::new(root);
        let ignore_path = root.join(IGNORE_FILE);

        match std::fs::read_to_string(&ignore_path) {
            Ok(content) => filter.patterns = parse_patterns(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(Error::internal_io(
                    e.to_string(),
                    Some(format!("read {}", ignore_path.display())),
                ))
            }
        }

        Ok(filter)
    }

    pub fn with_patterns(mut self, patterns: impl IntoIterator<Item = String>) -> Self {
        self.patterns.extend(patterns);
        self
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    fn matches_pattern(&self, path: &Path, name: &str) -> bool {
        if self.patterns.is_empty() {
            return false;
        }

        let relative = path
            .strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        self.patterns
            .iter()
            .any(|pattern| glob_match(pattern, name) || glob_match(pattern, &relative))
    }
}

impl Exclude for Filter {
    fn is_excluded(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };

        VCS_DIRS.contains(&name.as_ref())
            || OS_ARTIFACTS.contains(&name.as_ref())
            || self.matches_pattern(path, &name)
    }
}

/// One glob per line; blank lines and `#` comments are skipped. A trailing
/// `/` is dropped so `build/` and `build` both name the directory.
fn parse_patterns(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.trim_end_matches('/').to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn builtin_exclusions_match_base_name() {
        let filter = Filter::new(Path::new("/work"));
        let cases = [
            ("t1", false),
            ("p/t1", false),
            ("p/.git/d", false),
            ("p/.git", true),
            (".git", true),
            (".hg", true),
            (".svn", true),
            ("src/.DS_Store", true),
        ];
        for (path, want) in cases {
            assert_eq!(filter.is_excluded(Path::new(path)), want, "path: {}", path);
        }
    }

    #[test]
    fn parse_patterns_skips_comments_and_blanks() {
        let patterns = parse_patterns("# generated\n\n*.lock\n  build/  \n/\n");
        assert_eq!(patterns, vec!["*.lock".to_string(), "build".to_string()]);
    }

    #[test]
    fn patterns_match_name_or_relative_path() {
        let filter = Filter::new(Path::new("/work"))
            .with_patterns(vec!["*.lock".to_string(), "docs/generated".to_string()]);

        assert!(filter.is_excluded(Path::new("/work/Cargo.lock")));
        assert!(filter.is_excluded(Path::new("/work/docs/generated")));
        assert!(!filter.is_excluded(Path::new("/work/generated")));
        assert!(!filter.is_excluded(Path::new("/work/src/main.rs")));
    }

    #[test]
    fn load_reads_ignore_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(IGNORE_FILE), "vendor\n*.min.js\n").unwrap();

        let filter = Filter::load(dir.path()).unwrap();
        assert_eq!(filter.patterns().len(), 2);
        assert!(filter.is_excluded(&dir.path().join("vendor")));
        assert!(filter.is_excluded(&dir.path().join("web").join("app.min.js")));
    }

    #[test]
    fn load_without_ignore_file_uses_builtins() {
        let dir = tempdir().unwrap();
        let filter = Filter::load(dir.path()).unwrap();
        assert!(filter.patterns().is_empty());
        assert!(filter.is_excluded(&dir.path().join(".git")));
    }

    #[test]
    fn closures_act_as_exclusions() {
        let exclude = |path: &Path| path.ends_with("skip");
        assert!(exclude.is_excluded(Path::new("a/skip")));
        assert!(!exclude.is_excluded(Path::new("a/keep")));
    }
}
