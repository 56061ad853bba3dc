// src/exec/multiplex.rs

//! Stream multiplexer: stdout + stderr → one ordered event channel.
//!
//! One reader task per pipe emits a [`StreamEvent`] per line. A third task
//! joins both readers and only then drops the last sender, so the receiver
//! sees the channel close exactly when both pipes have hit end-of-input.
//!
//! Lines of one pipe keep their order; lines of different pipes interleave
//! however the readers happen to run.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::event::StreamEvent;
use crate::types::StreamKind;

/// Capacity of the merged channel. One slot keeps the readers in lockstep
/// with the consumer instead of buffering output ahead of the client.
pub const MERGED_CHANNEL_CAPACITY: usize = 1;

/// Longest line forwarded as one event. The rest of an overlong line is
/// dropped up to the next newline.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Start reading both pipes and return the merged event receiver.
pub fn spawn_multiplexer<O, E>(stdout: O, stderr: E) -> mpsc::Receiver<StreamEvent>
where
    O: AsyncRead + Unpin + Send + 'static,
    E: AsyncRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<StreamEvent>(MERGED_CHANNEL_CAPACITY);

    let stdout_reader = tokio::spawn(pump_lines(stdout, StreamKind::Stdout, tx.clone()));
    let stderr_reader = tokio::spawn(pump_lines(stderr, StreamKind::Stderr, tx.clone()));

    tokio::spawn(async move {
        let (out, err) = tokio::join!(stdout_reader, stderr_reader);
        for (kind, joined) in [(StreamKind::Stdout, out), (StreamKind::Stderr, err)] {
            match joined {
                Ok(lines) => debug!(stream = kind.as_str(), lines, "pipe reader finished"),
                Err(e) => warn!(stream = kind.as_str(), error = %e, "pipe reader task failed"),
            }
        }
        // Both readers are done; releasing the last sender closes the channel.
        drop(tx);
    });

    rx
}

/// Forward `reader` line by line as `kind` events. Returns the line count.
///
/// Lines longer than [`MAX_LINE_BYTES`] are truncated. Stops early if the
/// consumer has gone away or the pipe errors.
async fn pump_lines<R>(reader: R, kind: StreamKind, tx: mpsc::Sender<StreamEvent>) -> usize
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut count = 0usize;
    let mut skipping = false;

    loop {
        buf.clear();
        let read = (&mut reader)
            .take(MAX_LINE_BYTES as u64)
            .read_until(b'\n', &mut buf)
            .await;
        match read {
            Ok(0) => break,
            Ok(_) => {
                let complete = buf.ends_with(b"\n");
                if skipping {
                    skipping = !complete;
                    continue;
                }
                if !complete && buf.len() >= MAX_LINE_BYTES {
                    warn!(stream = kind.as_str(), limit = MAX_LINE_BYTES, "line too long; truncating");
                    skipping = true;
                }
                let event = StreamEvent::new(kind, decode_line(&buf));
                if tx.send(event).await.is_err() {
                    debug!(stream = kind.as_str(), "consumer gone; stopping pipe reader");
                    break;
                }
                count += 1;
            }
            Err(e) => {
                warn!(stream = kind.as_str(), error = %e, "error reading pipe");
                break;
            }
        }
    }

    count
}

/// Drop the line terminator (`\n` or `\r\n`) and decode lossily.
fn decode_line(raw: &[u8]) -> String {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}
