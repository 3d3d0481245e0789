use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures for a filtering run
///
/// Pattern problems are deliberately absent: a malformed pattern degrades
/// to a never-matching rule instead of failing the run.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to open source log {path}")]
    OpenSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read source log {path}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create filtered output {path}")]
    CreateSink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write filtered output {path}")]
    SinkWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
