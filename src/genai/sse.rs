//! Server-Sent Events parsing for the streaming model endpoint.
//!
//! The endpoint (`:streamGenerateContent?alt=sse`) emits one `data:` frame
//! per generated chunk, frames separated by a blank line. This parser
//! handles:
//! - Frames split across TCP chunks
//! - Multiple frames in one read
//! - Comment lines and `\r\n` line endings

/// Stateful SSE parser that buffers incomplete frames across chunk boundaries.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: String,
}

impl SseParser {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Feed a chunk of the response body and return the data payloads of all
    /// frames completed by it.
    pub fn feed(&mut self, chunk: &str) -> Vec<String> {
        self.buffer.push_str(chunk);
        let mut payloads = Vec::new();

        while let Some(boundary) = self.find_frame_boundary() {
            let frame = self.buffer[..boundary].to_string();
            self.buffer = self.buffer[boundary..]
                .trim_start_matches(['\r', '\n'])
                .to_string();

            if let Some(payload) = Self::frame_data(&frame) {
                payloads.push(payload);
            }
        }

        payloads
    }

    /// Flush whatever is left once the body stream ends. The final frame is
    /// not always followed by a blank line.
    pub fn finish(self) -> Option<String> {
        Self::frame_data(&self.buffer)
    }

    /// Find the end of a complete SSE frame (blank line boundary).
    fn find_frame_boundary(&self) -> Option<usize> {
        if let Some(pos) = self.buffer.find("\n\n") {
            return Some(pos + 2);
        }
        if let Some(pos) = self.buffer.find("\r\n\r\n") {
            return Some(pos + 4);
        }
        None
    }

    /// Extract the joined `data:` payload of one frame, if it has any.
    fn frame_data(frame: &str) -> Option<String> {
        let mut data_lines: Vec<&str> = Vec::new();

        for line in frame.lines() {
            let line = line.trim();

            // Skip blank lines and SSE comments
            if line.is_empty() || line.starts_with(':') {
                continue;
            }

            if let Some(data) = line.strip_prefix("data:") {
                let data = data.trim();
                if !data.is_empty() {
                    data_lines.push(data);
                }
            }
        }

        if data_lines.is_empty() {
            None
        } else {
            // The SSE spec allows multi-line data
            Some(data_lines.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_frame_in_one_chunk() {
        let mut parser = SseParser::new();
        let payloads = parser.feed("data: {\"a\":1}\r\n\r\n");
        assert_eq!(payloads, vec!["{\"a\":1}"]);
    }

    #[test]
    fn multiple_frames_in_one_chunk() {
        let mut parser = SseParser::new();
        let payloads = parser.feed("data: one\n\ndata: two\n\ndata: three\n\n");
        assert_eq!(payloads, vec!["one", "two", "three"]);
    }

    #[test]
    fn frame_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.feed("data: {\"text\":").is_empty());
        let payloads = parser.feed("\"hello\"}\r\n\r\n");
        assert_eq!(payloads, vec!["{\"text\":\"hello\"}"]);
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let mut parser = SseParser::new();
        let payloads = parser.feed(": keep-alive\n\ndata: payload\n\n");
        assert_eq!(payloads, vec!["payload"]);
    }

    #[test]
    fn finish_flushes_unterminated_frame() {
        let mut parser = SseParser::new();
        assert!(parser.feed("data: tail").is_empty());
        assert_eq!(parser.finish(), Some("tail".to_string()));
    }

    #[test]
    fn finish_is_none_for_empty_buffer() {
        let parser = SseParser::new();
        assert_eq!(parser.finish(), None);
    }
}
