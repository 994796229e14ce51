use clap::Args;
use std::path::PathBuf;

use retree::confirm::{AlwaysYes, Confirm, Prompter};
use retree::filter::Filter;
use retree::local_files::LocalFs;
use retree::log_status;
use retree::report::{ConsoleReporter, Reporter};
use retree::walk::walk;
use retree::{Error, MatchSpec, Replacer, RewriteOptions, Rewriter, RunSummary};

use crate::commands::CmdResult;

#[derive(Args, Debug)]
pub struct RewriteArgs {
    /// Text to search for in file contents and names
    pub search: String,

    /// Replacement text (may use $1, ${name} with --regexp)
    pub replace: String,

    /// Do not change anything
    #[arg(short, long)]
    pub dry_run: bool,

    /// Treat search string as regular expression
    #[arg(short, long)]
    pub regexp: bool,

    /// Show verbose debug information
    #[arg(short, long)]
    pub verbose: bool,

    /// Confirm every replacement
    #[arg(short, long)]
    pub interactive: bool,

    /// Root directory to rewrite (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub path: Option<String>,

    /// Do not read the .retreeignore file from the root
    #[arg(long)]
    pub no_ignore_file: bool,
}

/// Rewrite the tree and return the run summary.
///
/// `report_to_stderr` moves the human-readable report off stdout so that it
/// can carry the JSON envelope.
pub fn run(args: RewriteArgs, report_to_stderr: bool) -> CmdResult<RunSummary> {
    let spec = if args.regexp {
        MatchSpec::regex(&args.search, &args.replace)
    } else {
        MatchSpec::literal(&args.search, &args.replace)
    };
    // Compile before touching the tree so a bad pattern stops the run early.
    let replacer = Replacer::new(&spec)?;

    let root = resolve_root(args.path.as_deref())?;
    let filter = if args.no_ignore_file {
        Filter::new(&root)
    } else {
        Filter::load(&root)?
    };

    let mut reporter: Box<dyn Reporter> = if report_to_stderr {
        Box::new(ConsoleReporter::stderr(args.verbose))
    } else {
        Box::new(ConsoleReporter::stdout(args.verbose))
    };
    let mut confirm: Box<dyn Confirm> = if args.interactive {
        Box::new(Prompter::stdio())
    } else {
        Box::new(AlwaysYes)
    };

    log_status!("retree", "Scanning {}", root.display());
    let walked = walk(&root, &filter);
    for err in &walked.errors {
        reporter.error(err);
    }

    let options = RewriteOptions {
        dry_run: args.dry_run,
        interactive: args.interactive,
    };
    let fs = LocalFs::new();
    let mut summary = Rewriter::new(
        &root,
        &replacer,
        options,
        &fs,
        reporter.as_mut(),
        confirm.as_mut(),
    )
    .run(&walked.entries);
    summary.errors += walked.errors.len();

    log_status!(
        "retree",
        "{} files changed, {} entries renamed, {} errors",
        summary.files_changed,
        summary.entries_renamed,
        summary.errors
    );

    Ok((summary, 0))
}

fn resolve_root(path: Option<&str>) -> retree::Result<PathBuf> {
    let root = match path {
        Some(p) => PathBuf::from(shellexpand::tilde(p).into_owned()),
        None => std::env::current_dir().map_err(|e| {
            Error::internal_io(e.to_string(), Some("read current directory".to_string()))
        })?,
    };

    let metadata = std::fs::metadata(&root)
        .map_err(|e| Error::entry_io("open", root.display().to_string(), e))?;
    if !metadata.is_dir() {
        return Err(Error::validation_invalid_argument(
            "path",
            "Root must be a directory",
            Some(root.display().to_string()),
        ));
    }

    Ok(root)
}
