//! Incremental stream decoding: bytes → text → lines → events.
//!
//! DESIGN
//! ======
//! The response body arrives in arbitrary transport chunks. Decoding runs in
//! three stages, each with its own state:
//!
//! 1. `Utf8ChunkDecoder` keeps up to three trailing bytes of an incomplete
//!    multi-byte character between reads, so characters split across chunk
//!    boundaries decode intact.
//! 2. `StreamDecoder` splits decoded text into lines according to the
//!    configured `LineFraming`.
//! 3. `parse_line` turns a `data: <json>` line into a `StreamEvent`.
//!
//! TRADE-OFFS
//! ==========
//! `LineFraming::PerChunk` splits each decoded chunk on its own and carries
//! nothing across reads. A `data:` line cut by a chunk boundary is seen as
//! two fragments: the head fails JSON parsing and the tail lacks the prefix,
//! so that event is lost. `LineFraming::Buffered` holds the unterminated tail
//! until the next read and flushes it at end of stream.

use std::char::REPLACEMENT_CHARACTER;

use crate::types::StreamEvent;

pub const DATA_PREFIX: &str = "data: ";

// =============================================================================
// LINE FRAMING
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineFraming {
    /// Split each decoded chunk independently.
    #[default]
    PerChunk,
    /// Carry an unterminated line over to the next chunk.
    Buffered,
}

impl LineFraming {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "per_chunk" => Some(Self::PerChunk),
            "buffered" => Some(Self::Buffered),
            _ => None,
        }
    }
}

// =============================================================================
// UTF-8
// =============================================================================

/// Streaming UTF-8 decoder. Invalid sequences decode to U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    incomplete: Vec<u8>,
}

impl Utf8ChunkDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `bytes`, holding back a trailing partial character.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let mut buf = std::mem::take(&mut self.incomplete);
        buf.extend_from_slice(bytes);

        let mut out = String::with_capacity(buf.len());
        let mut start = 0;
        while start < buf.len() {
            match std::str::from_utf8(&buf[start..]) {
                Ok(text) => {
                    out.push_str(text);
                    start = buf.len();
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&buf[start..start + valid]));
                    match e.error_len() {
                        Some(len) => {
                            out.push(REPLACEMENT_CHARACTER);
                            start += valid + len;
                        }
                        None => {
                            start += valid;
                            break;
                        }
                    }
                }
            }
        }

        self.incomplete = buf[start..].to_vec();
        out
    }

    /// Flush a dangling partial character at end of input.
    pub fn finish(&mut self) -> String {
        if self.incomplete.is_empty() {
            return String::new();
        }
        self.incomplete.clear();
        REPLACEMENT_CHARACTER.to_string()
    }
}

// =============================================================================
// LINES
// =============================================================================

/// Bytes in, complete lines out.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    utf8: Utf8ChunkDecoder,
    framing: LineFraming,
    carry: String,
}

impl StreamDecoder {
    #[must_use]
    pub fn new(framing: LineFraming) -> Self {
        Self { utf8: Utf8ChunkDecoder::new(), framing, carry: String::new() }
    }

    /// Decode one transport chunk and return the lines it yields, in order.
    /// Empty lines are dropped.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let text = self.utf8.decode(bytes);
        match self.framing {
            LineFraming::PerChunk => split_lines(&text),
            LineFraming::Buffered => {
                self.carry.push_str(&text);
                let Some(last_newline) = self.carry.rfind('\n') else {
                    return Vec::new();
                };
                let rest = self.carry.split_off(last_newline + 1);
                let complete = std::mem::replace(&mut self.carry, rest);
                split_lines(&complete)
            }
        }
    }

    /// Lines still held at end of stream. `PerChunk` holds none.
    pub fn finish(&mut self) -> Vec<String> {
        match self.framing {
            LineFraming::PerChunk => Vec::new(),
            LineFraming::Buffered => {
                let tail = self.utf8.finish();
                self.carry.push_str(&tail);
                let remaining = std::mem::take(&mut self.carry);
                split_lines(&remaining)
            }
        }
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

// =============================================================================
// EVENTS
// =============================================================================

/// What a single line means to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    Event(StreamEvent),
    /// Had the `data: ` prefix but the payload was not a known event.
    Malformed(String),
    /// Not a data line.
    Ignored,
}

#[must_use]
pub fn parse_line(line: &str) -> LineEvent {
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return LineEvent::Ignored;
    };
    match serde_json::from_str::<StreamEvent>(payload) {
        Ok(event) => LineEvent::Event(event),
        Err(e) => LineEvent::Malformed(e.to_string()),
    }
}

#[cfg(test)]
#[path = "decode_test.rs"]
mod tests;
