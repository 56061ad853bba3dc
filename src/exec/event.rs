// src/exec/event.rs

use serde::{Deserialize, Serialize};

use crate::types::StreamKind;

/// One line of output delivered to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamEvent {
    pub stream: StreamKind,
    pub data: String,
}

impl StreamEvent {
    pub fn new(stream: StreamKind, data: impl Into<String>) -> Self {
        Self {
            stream,
            data: data.into(),
        }
    }

    pub fn stdout(data: impl Into<String>) -> Self {
        Self::new(StreamKind::Stdout, data)
    }

    pub fn stderr(data: impl Into<String>) -> Self {
        Self::new(StreamKind::Stderr, data)
    }

    pub fn system(data: impl Into<String>) -> Self {
        Self::new(StreamKind::System, data)
    }

    /// Serialize as one JSON object followed by `\n`.
    pub fn to_json_line(&self) -> serde_json::Result<Vec<u8>> {
        let mut buf = serde_json::to_vec(self)?;
        buf.push(b'\n');
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_line_shape() {
        let line = StreamEvent::stderr("oops \"quoted\"").to_json_line().unwrap();
        assert_eq!(
            std::str::from_utf8(&line).unwrap(),
            "{\"stream\":\"stderr\",\"data\":\"oops \\\"quoted\\\"\"}\n"
        );
    }
}
