//! Incremental terminal rendering of one streamed reply.
//!
//! Snapshots arrive through a `watch` channel, so intermediate states can be
//! coalesced. The renderer only relies on `pending` being append-only while
//! its request is active, and on the finished reply landing in history at a
//! known index.

use std::io::{self, Write};

use chat::{SessionSnapshot, SessionStatus};
use uuid::Uuid;

/// How a request ended, as seen from the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Replied,
    Failed(String),
    Cancelled,
}

pub struct ReplyRenderer {
    request_id: Uuid,
    /// History index where the assistant reply will land.
    reply_index: usize,
    printed: usize,
}

impl ReplyRenderer {
    #[must_use]
    pub fn new(request_id: Uuid, reply_index: usize) -> Self {
        Self { request_id, reply_index, printed: 0 }
    }

    /// Write whatever is new in `snapshot`. Returns the outcome once the
    /// request is no longer active.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `out`.
    pub fn update(&mut self, snapshot: &SessionSnapshot, out: &mut impl Write) -> io::Result<Option<Outcome>> {
        if snapshot.active_request == Some(self.request_id) {
            self.write_from(&snapshot.pending, out)?;
            return Ok(None);
        }

        let outcome = match (&snapshot.status, snapshot.history.get(self.reply_index)) {
            (SessionStatus::Error(message), _) => {
                if self.printed > 0 {
                    writeln!(out)?;
                }
                writeln!(out, "ERROR: {message}")?;
                Outcome::Failed(message.clone())
            }
            (_, Some(reply)) => {
                self.write_from(&reply.content, out)?;
                writeln!(out)?;
                Outcome::Replied
            }
            (_, None) => {
                if self.printed > 0 {
                    writeln!(out)?;
                }
                writeln!(out, "[cancelled]")?;
                Outcome::Cancelled
            }
        };
        out.flush()?;
        Ok(Some(outcome))
    }

    fn write_from(&mut self, text: &str, out: &mut impl Write) -> io::Result<()> {
        if let Some(fresh) = text.get(self.printed..).filter(|s| !s.is_empty()) {
            out.write_all(fresh.as_bytes())?;
            out.flush()?;
            self.printed = text.len();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
