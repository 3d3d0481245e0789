//! Filtered-to-source navigation for logsift
//!
//! This crate tracks which filtered output file came from which source
//! log and resolves filtered line positions back to source locations. It
//! also owns the short-lived pending-navigation token used to play a
//! one-shot highlight when the jump target is opened.

mod registry;

pub use registry::{SourceLocation, SourceMapRegistry};

// Re-export types used in our public API
pub use logsift_engine::LineIndexMap;
