// ABOUTME: Server-Sent Events frame encoding for MCP responses and stream events
// ABOUTME: Writes byte-exact event/id/data frames with multi-line data splitting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::events;
use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;

/// One SSE frame
///
/// Encodes as
///
/// ```text
/// event: <event>\n
/// id: <id>\n
/// data: <line 1>\n
/// data: <line 2>\n
/// \n
/// ```
///
/// with the `event` and `id` lines omitted when unset. Data is split on `\n`,
/// `\r\n`, and `\r`, so a payload can never terminate the frame early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    event: Option<String>,
    id: Option<String>,
    data: String,
}

impl SseEvent {
    /// Frame carrying `data` with no event name
    #[must_use]
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            event: None,
            id: None,
            data: data.into(),
        }
    }

    /// `message` frame carrying a serialized JSON-RPC envelope
    #[must_use]
    pub fn message(data: impl Into<String>) -> Self {
        Self::new(data).event(events::MESSAGE)
    }

    /// Frame whose data is `payload` serialized as JSON
    ///
    /// # Errors
    ///
    /// Returns an error if `payload` cannot be serialized
    pub fn json<T: Serialize>(event: &str, payload: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::to_string(payload)?).event(event))
    }

    /// Set the event name
    #[must_use]
    pub fn event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Set the event id
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Append the encoded frame to `buf`
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.reserve(self.encoded_len_hint());

        if let Some(event) = &self.event {
            put_field(buf, "event", event);
        }
        if let Some(id) = &self.id {
            put_field(buf, "id", id);
        }
        for line in split_lines(&self.data) {
            put_field(buf, "data", line);
        }
        buf.put_u8(b'\n');
    }

    /// Encode into a standalone buffer
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        buf.freeze()
    }

    fn encoded_len_hint(&self) -> usize {
        self.event.as_ref().map_or(0, |e| e.len() + 8)
            + self.id.as_ref().map_or(0, |i| i.len() + 5)
            + self.data.len()
            + 8
    }
}

fn put_field(buf: &mut BytesMut, name: &str, value: &str) {
    buf.put_slice(name.as_bytes());
    buf.put_slice(b": ");
    buf.put_slice(value.as_bytes());
    buf.put_u8(b'\n');
}

/// Split on any SSE line terminator; an empty payload still yields one line
fn split_lines(data: &str) -> Vec<&str> {
    let bytes = data.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&data[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&data[start..i]);
                i += 1;
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    lines.push(&data[start..]);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_frame_is_byte_exact() {
        let body = r#"{"jsonrpc":"2.0","result":{},"id":1}"#;
        let frame = SseEvent::message(body).to_bytes();
        assert_eq!(
            &frame[..],
            format!("event: message\ndata: {body}\n\n").as_bytes()
        );
    }

    #[test]
    fn test_multiline_data_gets_one_field_per_line() {
        let frame = SseEvent::new("a\nb\nc").to_bytes();
        assert_eq!(&frame[..], b"data: a\ndata: b\ndata: c\n\n");
    }

    #[test]
    fn test_crlf_data() {
        let frame = SseEvent::new("a\r\nb").to_bytes();
        assert_eq!(&frame[..], b"data: a\ndata: b\n\n");
    }

    #[test]
    fn test_empty_data_still_has_data_field() {
        let frame = SseEvent::new("").event("ping").id("7").to_bytes();
        assert_eq!(&frame[..], b"event: ping\nid: 7\ndata: \n\n");
    }

    #[test]
    fn test_json_event() {
        let frame = SseEvent::json("heartbeat", &json!({"timestamp": "t"}))
            .unwrap()
            .to_bytes();
        assert_eq!(&frame[..], b"event: heartbeat\ndata: {\"timestamp\":\"t\"}\n\n");
    }
}
