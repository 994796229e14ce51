//! Rewrite orchestrator.
//!
//! Applies one `Replacer` to the contents and base names of walked entries.
//! Entries are visited in reverse pre-order, so every descendant is written
//! and renamed before any of its ancestors is renamed and the paths collected
//! by the walk stay valid for the whole run.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::confirm::Confirm;
use crate::error::{Error, ErrorCode};
use crate::local_files::{FileSystem, Stat};
use crate::replace::{MatchContext, Replacer};
use crate::report::Reporter;
use crate::walk::Entry;

#[derive(Debug, Clone, Copy, Default)]
pub struct RewriteOptions {
    /// Report what would change without touching the disk.
    pub dry_run: bool,
    /// Ask before every content replacement and every rename.
    pub interactive: bool,
}

/// What happened to a file's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentOutcome {
    Unchanged,
    Written,
    WriteSkippedDryRun,
    /// Not valid UTF-8; left alone.
    NotText,
    ReadFailed,
    WriteFailed,
}

/// What happened to an entry's base name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NameOutcome {
    Unchanged,
    Renamed,
    RenameSkippedDryRun,
    RenameFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryReport {
    /// Path relative to the root.
    pub path: String,
    pub is_dir: bool,
    /// `None` for directories and for entries that could not be stat'ed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentOutcome>,
    /// `None` when the entry could not be stat'ed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<NameOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renamed_to: Option<String>,
    pub matches: usize,
    pub replacements: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl EntryReport {
    fn new(path: String) -> Self {
        EntryReport {
            path,
            is_dir: false,
            content: None,
            name: None,
            renamed_to: None,
            matches: 0,
            replacements: 0,
            errors: Vec::new(),
        }
    }

    fn content_changed(&self) -> bool {
        matches!(
            self.content,
            Some(ContentOutcome::Written | ContentOutcome::WriteSkippedDryRun)
        )
    }

    fn name_changed(&self) -> bool {
        matches!(
            self.name,
            Some(NameOutcome::Renamed | NameOutcome::RenameSkippedDryRun)
        )
    }

    fn is_notable(&self) -> bool {
        self.content_changed() || self.name_changed() || !self.errors.is_empty()
    }
}

/// Totals for one run plus a report for every entry that changed or failed.
///
/// In dry-run mode `files_changed` and `entries_renamed` count what would
/// have changed.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub dry_run: bool,
    pub entries: usize,
    pub matches: usize,
    pub replacements: usize,
    pub files_changed: usize,
    pub entries_renamed: usize,
    pub errors: usize,
    pub reports: Vec<EntryReport>,
}

impl RunSummary {
    fn record(&mut self, report: EntryReport) {
        self.entries += 1;
        self.matches += report.matches;
        self.replacements += report.replacements;
        self.errors += report.errors.len();
        if report.content_changed() {
            self.files_changed += 1;
        }
        if report.name_changed() {
            self.entries_renamed += 1;
        }
        if report.is_notable() {
            self.reports.push(report);
        }
    }
}

pub struct Rewriter<'a> {
    root: PathBuf,
    replacer: &'a Replacer,
    options: RewriteOptions,
    fs: &'a dyn FileSystem,
    reporter: &'a mut dyn Reporter,
    confirm: &'a mut dyn Confirm,
}

impl<'a> Rewriter<'a> {
    pub fn new(
        root: &Path,
        replacer: &'a Replacer,
        options: RewriteOptions,
        fs: &'a dyn FileSystem,
        reporter: &'a mut dyn Reporter,
        confirm: &'a mut dyn Confirm,
    ) -> Self {
        Rewriter {
            root: root.to_path_buf(),
            replacer,
            options,
            fs,
            reporter,
            confirm,
        }
    }

    /// Rewrite `entries`, given in pre-order as produced by the walker.
    ///
    /// Failures on one entry are reported and recorded, never fatal. There is
    /// no rollback: whatever was written or renamed before a failure stays.
    pub fn run(&mut self, entries: &[Entry]) -> RunSummary {
        let spec = self.replacer.spec();
        self.reporter.info(&format!(
            "(search: {}, replace: {}, dry-run: {}, regexp: {})",
            spec.pattern, spec.replacement, self.options.dry_run, spec.is_regex
        ));
        self.reporter
            .verbose(&format!("Root-Directory: {}", self.root.display()));

        let mut summary = RunSummary {
            dry_run: self.options.dry_run,
            ..RunSummary::default()
        };

        let total = entries.len();
        for (done, entry) in entries.iter().rev().enumerate() {
            let shown = self.display(&entry.path);
            self.reporter
                .verbose(&format!("Processing({}/{}) {}...", done + 1, total, shown));
            let report = self.process(entry);
            summary.record(report);
        }

        summary
    }

    fn process(&mut self, entry: &Entry) -> EntryReport {
        let path = entry.path.as_path();
        let mut report = EntryReport::new(self.display(path));
        report.is_dir = entry.is_dir;

        // The walk is a snapshot; re-check right before touching the entry.
        let stat = match self.fs.stat(path) {
            Ok(stat) => stat,
            Err(err) => {
                self.fail(&mut report, path, err);
                return report;
            }
        };
        report.is_dir = stat.is_dir;

        if !stat.is_dir {
            report.content = Some(self.rewrite_content(path, &stat, &mut report));
        }
        report.name = Some(self.rewrite_name(path, &mut report));

        report
    }

    fn rewrite_content(
        &mut self,
        path: &Path,
        stat: &Stat,
        report: &mut EntryReport,
    ) -> ContentOutcome {
        let content = match self.fs.read(path) {
            Ok(content) => content,
            Err(err) if err.code == ErrorCode::ContentNotText => {
                let shown = self.display(path);
                self.reporter
                    .verbose(&format!("Skipping non-text content: {}", shown));
                return ContentOutcome::NotText;
            }
            Err(err) => {
                self.fail(report, path, err);
                return ContentOutcome::ReadFailed;
            }
        };

        let shown = self.display(path);
        let interactive = self.options.interactive;
        let reporter = &mut *self.reporter;
        let confirm = &mut *self.confirm;
        let mut matches = 0;
        let mut accepted = 0;

        let rewritten = self.replacer.execute(&content, &mut |ctx: &MatchContext| {
            matches += 1;
            reporter.header(&format!("Match #{} in {}", matches, shown));
            reporter.replacement(ctx);

            let apply = !interactive || confirm.ask("Replace?");
            if apply {
                accepted += 1;
            }
            apply
        });

        report.matches += matches;
        report.replacements += accepted;

        if rewritten == content {
            return ContentOutcome::Unchanged;
        }

        self.reporter.info(&format!("Write: {}", shown));
        if self.options.dry_run {
            return ContentOutcome::WriteSkippedDryRun;
        }

        match self.fs.write(path, &rewritten, &stat.permissions) {
            Ok(()) => ContentOutcome::Written,
            Err(err) => {
                self.fail(report, path, err);
                ContentOutcome::WriteFailed
            }
        }
    }

    fn rewrite_name(&mut self, path: &Path, report: &mut EntryReport) -> NameOutcome {
        // Names that are not valid UTF-8 cannot be matched as text.
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return NameOutcome::Unchanged;
        };

        let interactive = self.options.interactive;
        let reporter = &mut *self.reporter;
        let confirm = &mut *self.confirm;
        let mut matches = 0;
        let mut accepted = 0;

        let new_name = self.replacer.execute(name, &mut |ctx: &MatchContext| {
            matches += 1;
            reporter.rename(&ctx.match_text, &ctx.replacement_text);

            let apply = !interactive || confirm.ask("Rename?");
            if apply {
                accepted += 1;
            }
            apply
        });

        report.matches += matches;
        report.replacements += accepted;

        if new_name == name {
            return NameOutcome::Unchanged;
        }

        if !is_valid_file_name(&new_name) {
            let err = Error::entry_io(
                "move",
                self.display(path),
                format!("invalid file name: {:?}", new_name),
            );
            self.reporter.error(&err);
            report.errors.push(err.message);
            return NameOutcome::RenameFailed;
        }

        let target = path.with_file_name(&new_name);
        let shown_target = self.display(&target);
        self.reporter.header(&format!("Move to: {}", shown_target));
        report.renamed_to = Some(shown_target);

        if self.options.dry_run {
            return NameOutcome::RenameSkippedDryRun;
        }

        match self.fs.rename(path, &target) {
            Ok(()) => NameOutcome::Renamed,
            Err(err) => {
                self.fail(report, path, err);
                NameOutcome::RenameFailed
            }
        }
    }

    fn fail(&mut self, report: &mut EntryReport, path: &Path, err: Error) {
        let err = self.shorten_error(path, err);
        self.reporter.error(&err);
        report.errors.push(err.message);
    }

    /// Re-render a per-entry I/O error with the root-relative path.
    fn shorten_error(&self, path: &Path, err: Error) -> Error {
        if err.code != ErrorCode::InternalIoError {
            return err;
        }
        match (err.details["action"].as_str(), err.details["error"].as_str()) {
            (Some(action), Some(cause)) => Error::entry_io(action, self.display(path), cause),
            _ => err,
        }
    }

    fn display(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned()
    }
}

fn is_valid_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
