use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use logsift_types::{FilterGroup, FilterId};

use crate::error::ProcessError;
use crate::linemap::LineIndexMap;
use crate::pattern::PatternCache;
use crate::ruleset::CompiledRuleSet;
use crate::writer::OutputWriter;

/// Look-behind capacity; exceeds the largest context radius (9) with margin
const MAX_BEFORE_LINES: usize = 20;

/// Options for a filtering run
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessOptions {
    /// Prefix each output line with its zero-padded source line number
    pub prepend_line_numbers: bool,

    /// Sizes the zero padding; the width defaults to six digits
    pub total_line_count: Option<u64>,
}

/// Result of a completed filtering run
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub output_path: PathBuf,

    /// Lines read from the source
    pub processed: u64,

    /// Primary matches, not counting context lines
    pub matched: u64,

    pub line_map: LineIndexMap,

    /// Kept-line hit count per include rule
    pub rule_hits: HashMap<FilterId, u64>,
}

/// Stream `input` through the enabled filter groups, writing kept lines
/// (plus their context windows) to `output` in source order.
///
/// The source is read line by line and never materialized in memory. Each
/// source line is written at most once, even when context windows overlap.
/// Rule edits made after the call starts have no effect: the rule set is
/// compiled once from the given snapshot.
pub async fn process_file(
    input: &Path,
    output: &Path,
    groups: &[FilterGroup],
    options: ProcessOptions,
) -> Result<RunSummary, ProcessError> {
    let source = File::open(input).await.map_err(|err| ProcessError::OpenSource {
        path: input.to_path_buf(),
        source: err,
    })?;
    let sink = File::create(output).await.map_err(|err| ProcessError::CreateSink {
        path: output.to_path_buf(),
        source: err,
    })?;

    let read_err = |err| ProcessError::SourceRead {
        path: input.to_path_buf(),
        source: err,
    };
    let write_err = |err| ProcessError::SinkWrite {
        path: output.to_path_buf(),
        source: err,
    };

    let mut cache = PatternCache::new();
    let rules = CompiledRuleSet::compile(groups, &mut cache);

    let mut lines = BufReader::new(source).lines();
    let mut writer = OutputWriter::new(sink, options.prepend_line_numbers, options.total_line_count);

    let mut processed: u64 = 0;
    let mut matched: u64 = 0;
    let mut rule_hits: HashMap<FilterId, u64> = HashMap::new();

    // Most recent lines seen, tagged with their 1-based line numbers
    let mut before_buffer: VecDeque<(u64, String)> = VecDeque::with_capacity(MAX_BEFORE_LINES);
    // Lines still owed as trailing context for an earlier match
    let mut after_remaining: u32 = 0;
    // Highest 1-based line number already written; 0 means none yet.
    // A line can qualify both as trailing context of one match and as
    // look-behind of a later one; this watermark keeps it from being
    // written twice.
    let mut last_written: u64 = 0;

    while let Some(line) = lines.next_line().await.map_err(read_err)? {
        processed += 1;
        let decision = rules.evaluate_counting(&line, &mut rule_hits);

        if decision.kept {
            matched += 1;
            let radius = decision.context_radius as usize;

            // Flush the most recent `radius` buffered lines not yet written
            let start = before_buffer.len().saturating_sub(radius);
            for (index, text) in before_buffer.range(start..) {
                if *index > last_written {
                    writer.write_line(text, *index).await.map_err(write_err)?;
                    last_written = *index;
                }
            }

            if processed > last_written {
                writer.write_line(&line, processed).await.map_err(write_err)?;
                last_written = processed;
            }

            // Overlapping matches extend the trailing window, never shrink it
            after_remaining = after_remaining.max(decision.context_radius);
        } else if after_remaining > 0 {
            if processed > last_written {
                writer.write_line(&line, processed).await.map_err(write_err)?;
                last_written = processed;
            }
            after_remaining -= 1;
        }

        before_buffer.push_back((processed, line));
        if before_buffer.len() > MAX_BEFORE_LINES {
            before_buffer.pop_front();
        }
    }

    let line_map = writer.finish().await.map_err(write_err)?;

    tracing::debug!(
        input = %input.display(),
        output = %output.display(),
        processed,
        matched,
        written = line_map.len(),
        "filtering run complete"
    );

    Ok(RunSummary {
        output_path: output.to_path_buf(),
        processed,
        matched,
        line_map,
        rule_hits,
    })
}
