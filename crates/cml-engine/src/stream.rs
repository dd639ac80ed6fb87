use std::io::BufRead;

use crate::error::CmlError;
use crate::grammar::Grammar;
use crate::types::StreamEvent;

/// Pull-based incremental parser over a line-oriented source.
///
/// Each pulled event reads lines (newlines preserved) into a growing
/// buffer until the buffer holds a complete span; the earliest span by
/// start offset is then emitted and the consumed prefix discarded.
/// Dangling tags stay at the buffer tail for retry on later lines, and a
/// final scan after the source is exhausted catches a span whose close
/// arrived on the very last increment. A span is never surfaced before
/// its close marker has fully arrived.
///
/// The consumer controls pacing; dropping the stream simply stops
/// reading the source. A read failure surfaces at the point of the next
/// requested event, leaving already-produced events valid.
pub struct CmlStream<'g, R> {
    grammar: &'g Grammar,
    reader: R,
    buffer: String,
    /// Earliest offset at which a future match can start. Everything
    /// before it is proven free of open markers, so appending non-tag
    /// lines does not trigger full-buffer rescans.
    scan_from: usize,
    done: bool,
}

impl<'g, R: BufRead> CmlStream<'g, R> {
    pub(crate) fn new(grammar: &'g Grammar, reader: R) -> Self {
        Self {
            grammar,
            reader,
            buffer: String::new(),
            scan_from: 0,
            done: false,
        }
    }

    /// Emit the earliest complete span in the buffer, if any, and discard
    /// the consumed prefix.
    fn take_event(&mut self) -> Option<StreamEvent> {
        match self.grammar.next_match(&self.buffer, self.scan_from) {
            Some(m) => {
                let event = StreamEvent {
                    kind: m.kind,
                    tag: m.tag,
                    content: m.content,
                };
                self.buffer.drain(..m.end);
                self.scan_from = 0;
                Some(event)
            }
            None => {
                // No complete span yet; the next one can only start at an
                // open marker already buffered, or in a line not yet read.
                self.scan_from = self
                    .grammar
                    .first_open(&self.buffer, self.scan_from)
                    .unwrap_or(self.buffer.len());
                None
            }
        }
    }
}

impl<R: BufRead> Iterator for CmlStream<'_, R> {
    type Item = Result<StreamEvent, CmlError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.take_event() {
                return Some(Ok(event));
            }
            if self.done {
                return None;
            }
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => self.done = true,
                Ok(_) => self.buffer.push_str(&line),
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}
