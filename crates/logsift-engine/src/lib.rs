//! Streaming filter engine for logsift
//!
//! This crate compiles filter groups into evaluation-ready rule sets and
//! streams a log file through the match/context pipeline, producing a
//! filtered output file plus the line-index map that links every output
//! line back to its source line.

mod error;
mod linemap;
mod naming;
mod pattern;
mod processor;
mod ruleset;
mod writer;

pub use error::ProcessError;
pub use linemap::LineIndexMap;
pub use naming::{timestamped_output_path, DEFAULT_OUTPUT_PREFIX};
pub use pattern::PatternCache;
pub use processor::{process_file, ProcessOptions, RunSummary};
pub use ruleset::{CompiledGroup, CompiledRuleSet, IncludeRule, MatchDecision};

// Re-export types used in our public API
pub use logsift_types::{FilterGroup, FilterId, FilterItem, FilterKind};
