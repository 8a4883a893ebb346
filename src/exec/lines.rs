// src/exec/lines.rs

//! Splitting raw pipe output into lines.
//!
//! Encoders redraw their status line with a bare `\r`, so both `\r` and `\n`
//! terminate a line; a `\n` directly following `\r` is treated as part of the
//! same terminator. Trailing whitespace is stripped from every line.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: Vec<u8>,
    last_was_cr: bool,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes, returning every line it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();

        for &byte in chunk {
            match byte {
                b'\n' if self.last_was_cr => {
                    self.last_was_cr = false;
                }
                b'\n' | b'\r' => {
                    self.last_was_cr = byte == b'\r';
                    lines.push(self.take_pending());
                }
                _ => {
                    self.last_was_cr = false;
                    self.pending.push(byte);
                }
            }
        }

        lines
    }

    /// Flush the unterminated remainder, if any.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.take_pending())
        }
    }

    fn take_pending(&mut self) -> String {
        let bytes = std::mem::take(&mut self.pending);
        String::from_utf8_lossy(&bytes).trim_end().to_string()
    }
}

/// Read `stream` to EOF, forwarding every line into `tx`.
///
/// Stops early when the receiving side has gone away.
pub(crate) fn spawn_reader<R>(
    mut stream: R,
    tx: mpsc::UnboundedSender<String>,
    label: &'static str,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut splitter = LineSplitter::new();
        let mut buf = vec![0u8; 8 * 1024];

        loop {
            let n = match stream.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    debug!(stream = label, error = %e, "error reading process output");
                    break;
                }
            };

            for line in splitter.push(&buf[..n]) {
                if tx.send(line).is_err() {
                    trace!(stream = label, "line receiver dropped; reader stopping");
                    return;
                }
            }
        }

        if let Some(rest) = splitter.finish() {
            let _ = tx.send(rest);
        }

        trace!(stream = label, "reader reached end of stream");
    })
}
