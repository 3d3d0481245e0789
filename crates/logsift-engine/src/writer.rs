use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use crate::linemap::LineIndexMap;

/// Padding width when no total-line-count hint is available
const DEFAULT_PAD_WIDTH: usize = 6;

/// Writes emitted lines to the destination sink and records provenance
///
/// Writes suspend while the sink applies backpressure; lines are never
/// dropped or reordered. Every line actually written appends its 0-based
/// source index to the line-index map.
pub(crate) struct OutputWriter<W> {
    sink: BufWriter<W>,
    prepend_line_numbers: bool,
    pad_width: usize,
    line_map: LineIndexMap,
}

impl<W: AsyncWrite + Unpin> OutputWriter<W> {
    pub(crate) fn new(sink: W, prepend_line_numbers: bool, total_line_count: Option<u64>) -> Self {
        let pad_width = total_line_count.map_or(DEFAULT_PAD_WIDTH, |n| n.to_string().len());
        Self {
            sink: BufWriter::new(sink),
            prepend_line_numbers,
            pad_width,
            line_map: LineIndexMap::new(),
        }
    }

    /// Write one line tagged with its 1-based source line number
    pub(crate) async fn write_line(&mut self, line: &str, source_line: u64) -> io::Result<()> {
        if self.prepend_line_numbers {
            let formatted = format!(
                "{:0width$}: {}\n",
                source_line,
                line,
                width = self.pad_width
            );
            self.sink.write_all(formatted.as_bytes()).await?;
        } else {
            self.sink.write_all(line.as_bytes()).await?;
            self.sink.write_all(b"\n").await?;
        }
        self.line_map.push(source_line - 1);
        Ok(())
    }

    /// Flush buffered data and finalize the sink before reporting the map
    pub(crate) async fn finish(mut self) -> io::Result<LineIndexMap> {
        self.sink.shutdown().await?;
        Ok(self.line_map)
    }
}
