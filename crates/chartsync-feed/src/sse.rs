//! Incremental server-sent-event frame decoder.
//!
//! Decodes the `text/event-stream` wire format from arbitrary byte chunks:
//! `event:` names the frame, `data:` lines accumulate (joined with newlines),
//! a blank line dispatches. Comment lines (leading `:`) and the `id:`/`retry:`
//! fields are ignored. Frames may be split across chunk boundaries.

/// One decoded SSE frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event name; `"message"` when the frame carried no `event:` field.
    pub event: String,
    /// Payload, with multiple `data:` lines joined by `\n`.
    pub data: String,
}

/// Streaming decoder. Feed it chunks as they arrive; it yields completed
/// frames and carries partial lines over to the next chunk.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: String,
    event: Option<String>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a chunk of bytes, returning any frames completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            let line = line.trim_end_matches(['\n', '\r']);
            self.process_line(line, &mut frames);
        }
        frames
    }

    fn process_line(&mut self, line: &str, frames: &mut Vec<SseEvent>) {
        if line.is_empty() {
            // Blank line dispatches the accumulated frame, if any.
            if !self.data.is_empty() {
                frames.push(SseEvent {
                    event: self
                        .event
                        .take()
                        .unwrap_or_else(|| "message".to_string()),
                    data: self.data.join("\n"),
                });
                self.data.clear();
            } else {
                self.event = None;
            }
            return;
        }

        if line.starts_with(':') {
            // Comment / keep-alive.
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            // id and retry are part of the protocol but unused here.
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_frame() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"event: live_update\ndata: {\"time\":100}\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "live_update");
        assert_eq!(frames[0].data, "{\"time\":100}");
    }

    #[test]
    fn test_frame_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"event: initial_").is_empty());
        assert!(decoder.feed(b"data\ndata: [1,").is_empty());
        let frames = decoder.feed(b"2]\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "initial_data");
        assert_eq!(frames[0].data, "[1,2]");
    }

    #[test]
    fn test_default_event_name() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"data: hello\n\n");
        assert_eq!(frames[0].event, "message");
    }

    #[test]
    fn test_multiline_data_joined() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"data: a\ndata: b\n\n");
        assert_eq!(frames[0].data, "a\nb");
    }

    #[test]
    fn test_comments_and_retry_ignored() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b": keep-alive\nretry: 3000\nid: 7\ndata: x\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "x");
    }

    #[test]
    fn test_crlf_lines() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"event: live_update\r\ndata: 1\r\n\r\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "live_update");
        assert_eq!(frames[0].data, "1");
    }

    #[test]
    fn test_blank_line_without_data_resets_event() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"event: orphan\n\n").is_empty());
        let frames = decoder.feed(b"data: x\n\n");
        // The orphaned event name must not leak into the next frame.
        assert_eq!(frames[0].event, "message");
    }

    #[test]
    fn test_two_frames_in_one_chunk() {
        let mut decoder = SseDecoder::new();
        let frames =
            decoder.feed(b"event: a\ndata: 1\n\nevent: b\ndata: 2\n\n");
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].event, "a");
        assert_eq!(frames[1].event, "b");
    }
}
