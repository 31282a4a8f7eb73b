//! Frame decoder: raw byte chunks to complete text lines.
//!
//! Chunk boundaries are arbitrary; a logical line (and even a single
//! multi-byte character) may span several chunks. The decoder buffers
//! bytes and only emits a line once its terminating newline has
//! arrived, so no line is ever split across two outputs and no partial
//! line is ever emitted.

use tracing::debug;

/// Incremental line decoder over a chunked byte stream.
///
/// Splitting happens on the raw `0x0A` byte, which never appears inside
/// a multi-byte UTF-8 sequence, so buffered continuation bytes stay
/// intact until their line completes. Invalid byte sequences degrade to
/// replacement characters rather than aborting consumption.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and collect every line it completes, in order.
    ///
    /// A trailing `\r` is stripped so `\r\n`-terminated streams decode
    /// the same as `\n`-terminated ones.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(idx) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line_bytes: Vec<u8> = self.buf.drain(..=idx).collect();
            line_bytes.pop(); // the newline itself
            if line_bytes.last() == Some(&b'\r') {
                line_bytes.pop();
            }
            lines.push(String::from_utf8_lossy(&line_bytes).into_owned());
        }
        lines
    }

    /// Signal end-of-stream.
    ///
    /// An unterminated trailing fragment is not a complete event and is
    /// discarded rather than parsed.
    pub fn finish(&mut self) {
        if !self.buf.is_empty() {
            debug!(
                len = self.buf.len(),
                "discarding unterminated trailing fragment"
            );
            self.buf.clear();
        }
    }
}
