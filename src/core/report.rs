//! Reporting of run progress, errors, and per-match context.
//!
//! The rewriter only emits structured events; formatting and coloring live
//! in the reporter implementations.

use console::Style;
use std::io::{self, Write};

use crate::error::Error;
use crate::replace::MatchContext;

/// Receiver for everything a run wants to show the user.
pub trait Reporter {
    fn info(&mut self, message: &str);
    /// Only shown in verbose mode.
    fn verbose(&mut self, message: &str);
    fn error(&mut self, error: &Error);
    /// Section header, e.g. `Match #2 in src/lib.rs`.
    fn header(&mut self, message: &str);
    /// The matched line and its replacement, between their context lines.
    fn replacement(&mut self, context: &MatchContext);
    /// A base-name rewrite about to be decided.
    fn rename(&mut self, from: &str, to: &str);
}

struct Palette {
    removed: Style,
    removed_match: Style,
    added: Style,
    added_match: Style,
    header: Style,
}

impl Palette {
    fn new(colored: bool) -> Self {
        let style = || Style::new().force_styling(colored);
        Palette {
            removed: style().red(),
            removed_match: style().red().underlined(),
            added: style().green(),
            added_match: style().green().underlined(),
            header: style().white().on_black().bold(),
        }
    }
}

/// Writes `[INFO]`/`[ERROR]` lines and colored match context to any writer.
pub struct ConsoleReporter<W: Write> {
    out: W,
    verbose: bool,
    palette: Palette,
}

impl ConsoleReporter<io::Stdout> {
    /// Report to stdout, colored when stdout is a terminal and `NO_COLOR` is unset.
    pub fn stdout(verbose: bool) -> Self {
        ConsoleReporter::new(io::stdout(), verbose, console::colors_enabled())
    }
}

impl ConsoleReporter<io::Stderr> {
    pub fn stderr(verbose: bool) -> Self {
        ConsoleReporter::new(io::stderr(), verbose, console::colors_enabled_stderr())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool, colored: bool) -> Self {
        ConsoleReporter {
            out,
            verbose,
            palette: Palette::new(colored),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // Broken pipes and closed terminals are not worth aborting a rewrite for.
    fn emit(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn info(&mut self, message: &str) {
        self.emit(&format!("[INFO] {}\n", message));
    }

    fn verbose(&mut self, message: &str) {
        if self.verbose {
            self.info(message);
        }
    }

    fn error(&mut self, error: &Error) {
        self.emit(&format!("[ERROR] {}\n", error.message));
    }

    fn header(&mut self, message: &str) {
        let line = format!("\n{}\n", self.palette.header.apply_to(format!(" {}", message)));
        self.emit(&line);
    }

    fn replacement(&mut self, context: &MatchContext) {
        let p = &self.palette;
        let text = format!(
            "{}{}{}{}{}{}{}{}",
            context.lines_before,
            p.removed.apply_to(context.matched_prefix()),
            p.removed_match.apply_to(&context.match_text),
            p.removed.apply_to(context.matched_suffix()),
            p.added.apply_to(context.replacement_prefix()),
            p.added_match.apply_to(&context.replacement_text),
            p.added.apply_to(context.replacement_suffix()),
            context.lines_after,
        );
        self.emit(&text);
        let _ = self.out.flush();
    }

    fn rename(&mut self, from: &str, to: &str) {
        self.emit(&format!("\nRename {} to {}\n", from, to));
    }
}

/// A reported event, as captured by `RecordingReporter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Info(String),
    Verbose(String),
    Error(String),
    Header(String),
    Replacement(MatchContext),
    Rename { from: String, to: String },
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<Event>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Error(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn headers(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Header(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn info(&mut self, message: &str) {
        self.events.push(Event::Info(message.to_string()));
    }

    fn verbose(&mut self, message: &str) {
        self.events.push(Event::Verbose(message.to_string()));
    }

    fn error(&mut self, error: &Error) {
        self.events.push(Event::Error(error.message.clone()));
    }

    fn header(&mut self, message: &str) {
        self.events.push(Event::Header(message.to_string()));
    }

    fn replacement(&mut self, context: &MatchContext) {
        self.events.push(Event::Replacement(context.clone()));
    }

    fn rename(&mut self, from: &str, to: &str) {
        self.events.push(Event::Rename {
            from: from.to_string(),
            to: to.to_string(),
        });
    }
}
