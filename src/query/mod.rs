//! Query routing and answer formatting for askdb.
//!
//! The classifier decides which path a question takes; the formatter turns
//! result rows into the prose the user sees.

pub mod classifier;
pub mod formatter;

pub use classifier::{classify, Classification, KeywordClassifier, QueryClassifier};
pub use formatter::format_results;
