//! Reassembles newline-delimited records from arbitrarily segmented chunks.
//!
//! The transport hands over whatever bytes it received, so one record may be
//! split across several chunks and one chunk may hold many records. The
//! splitter keeps the trailing partial line in a carry-over buffer and
//! prepends it to the next chunk. Splitting happens on raw bytes, so a
//! multi-byte UTF-8 sequence cut by a chunk boundary is reassembled before
//! it is decoded.

use bytes::BytesMut;

#[derive(Debug, Default)]
pub struct LineSplitter {
    /// Bytes received but not yet emitted as a complete line.
    buffer: BytesMut,
    /// Prefix of `buffer` already known to contain no terminator.
    scanned: usize,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk and returns the complete lines it closes.
    ///
    /// The iterator is lazy: lines are cut out of the buffer as it is
    /// advanced, and any lines it does not reach stay buffered for the next
    /// call.
    pub fn push(&mut self, chunk: &[u8]) -> CompleteLines<'_> {
        self.buffer.extend_from_slice(chunk);
        CompleteLines { splitter: self }
    }

    pub fn push_str(&mut self, chunk: &str) -> CompleteLines<'_> {
        self.push(chunk.as_bytes())
    }

    /// Ends the stream, returning the unterminated final line if it holds
    /// anything besides whitespace.
    pub fn finish(mut self) -> Option<String> {
        let rest = self.buffer.split();
        decode_line(&rest)
    }

    /// Drops the carry-over without emitting it. Used when the transport
    /// fails and the partial line can never be completed.
    pub fn discard(&mut self) -> usize {
        let dropped = self.buffer.len();
        self.buffer.clear();
        self.scanned = 0;
        dropped
    }

    /// Number of buffered bytes still waiting for a terminator.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    fn next_line(&mut self) -> Option<String> {
        loop {
            let offset = self.buffer[self.scanned..].iter().position(|&b| b == b'\n');
            let Some(offset) = offset else {
                self.scanned = self.buffer.len();
                return None;
            };
            let raw = self.buffer.split_to(self.scanned + offset + 1);
            self.scanned = 0;
            if let Some(line) = decode_line(&raw) {
                return Some(line);
            }
        }
    }
}

/// Lines completed by the most recent `push`.
pub struct CompleteLines<'a> {
    splitter: &'a mut LineSplitter,
}

impl Iterator for CompleteLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.splitter.next_line()
    }
}

/// Strips the terminator and rejects blank lines.
fn decode_line(raw: &[u8]) -> Option<String> {
    let mut end = raw.len();
    while end > 0 && matches!(raw[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    let text = String::from_utf8_lossy(&raw[..end]);
    if text.trim().is_empty() {
        return None;
    }
    Some(text.into_owned())
}
