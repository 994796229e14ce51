// Public modules
pub mod confirm;
pub mod error;
pub mod filter;
pub mod local_files;
pub mod replace;
pub mod report;
pub mod rewrite;
pub mod walk;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use replace::{MatchContext, MatchSpec, Replacer};
pub use rewrite::{RewriteOptions, Rewriter, RunSummary};
