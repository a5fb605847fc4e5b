//! Incremental decoder for `data:`-prefixed SSE frames.
//!
//! The backend streams the analysis as Server-Sent Events: frames separated
//! by a blank line (`\n\n`), each carrying a `data:` line whose payload is
//! either a JSON object or the literal `[DONE]` sentinel. Chunks arrive at
//! arbitrary byte boundaries, so the decoder buffers the trailing incomplete
//! fragment between pushes.

use tracing::debug;

/// Literal payload that terminates the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Prefix a frame must carry to be considered at all.
pub const DATA_PREFIX: &str = "data:";

/// Push-based SSE frame decoder. One instance per stream; not resettable.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: String,
    done: bool,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of stream text; returns the payload text of every frame
    /// completed by this chunk, in arrival order.
    ///
    /// Frames not starting with `data:` are discarded. Once the `[DONE]`
    /// sentinel is seen the decoder stops for good: remaining buffered bytes
    /// and all later chunks are ignored.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        if self.done {
            return Vec::new();
        }
        self.buffer.push_str(chunk);

        let mut payloads = Vec::new();
        while let Some(pos) = self.buffer.find("\n\n") {
            let frame = self.buffer[..pos].to_string();
            self.buffer.drain(..pos + 2);
            let Some(rest) = frame.strip_prefix(DATA_PREFIX) else {
                debug!(frame = %frame, "discarding non-data frame");
                continue;
            };
            let payload = rest.trim();
            if payload == DONE_SENTINEL {
                debug!("stream sentinel received");
                self.done = true;
                self.buffer.clear();
                break;
            }
            payloads.push(payload.to_string());
        }
        payloads
    }

    /// True once the `[DONE]` sentinel has been decoded.
    pub fn is_done(&self) -> bool {
        self.done
    }
}

/// Incremental UTF-8 decoder for byte chunks arriving at arbitrary offsets.
///
/// A multi-byte character split across two chunks is held back until its
/// remaining bytes arrive; genuinely invalid sequences are replaced rather
/// than dropped so the frame stream keeps flowing.
#[derive(Debug, Default)]
pub struct Utf8Chunker {
    pending: Vec<u8>,
}

impl Utf8Chunker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of the accumulated bytes as currently possible.
    pub fn push(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        match std::str::from_utf8(&self.pending) {
            Ok(s) => {
                let out = s.to_string();
                self.pending.clear();
                out
            }
            Err(err) if err.error_len().is_none() => {
                // Incomplete trailing sequence: decode up to it, keep the rest.
                let valid = err.valid_up_to();
                let out = String::from_utf8_lossy(&self.pending[..valid]).into_owned();
                self.pending.drain(..valid);
                out
            }
            Err(_) => {
                let out = String::from_utf8_lossy(&self.pending).into_owned();
                self.pending.clear();
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(decoder: &mut FrameDecoder, chunks: &[&str]) -> Vec<String> {
        let mut out = Vec::new();
        for chunk in chunks {
            out.extend(decoder.push(chunk));
        }
        out
    }

    #[test]
    fn single_chunk_single_frame() {
        let mut d = FrameDecoder::new();
        let frames = d.push("data: {\"step\":\"a\"}\n\n");
        assert_eq!(frames, vec!["{\"step\":\"a\"}"]);
        assert!(!d.is_done());
    }

    #[test]
    fn frame_split_across_chunks() {
        let mut d = FrameDecoder::new();
        assert!(d.push("data: {\"st").is_empty());
        assert!(d.push("ep\":\"a\"}").is_empty());
        let frames = d.push("\n\ndata: {\"step\":\"b\"}\n\n");
        assert_eq!(frames, vec!["{\"step\":\"a\"}", "{\"step\":\"b\"}"]);
    }

    #[test]
    fn chunk_boundary_independence() {
        let serialized = "data: {\"step\":\"x\"}\n\ndata: {\"step\":\"y\"}\n\ndata: {\"final\":1}\n\n";
        let mut whole = FrameDecoder::new();
        let expected = whole.push(serialized);

        // Every possible split point must decode identically.
        for split in 0..=serialized.len() {
            if !serialized.is_char_boundary(split) {
                continue;
            }
            let mut d = FrameDecoder::new();
            let got = drain(&mut d, &[&serialized[..split], &serialized[split..]]);
            assert_eq!(got, expected, "split at byte {split}");
        }
    }

    #[test]
    fn non_data_frames_discarded() {
        let mut d = FrameDecoder::new();
        let frames = d.push(": keepalive\n\nevent: ping\n\ndata: {\"a\":1}\n\n");
        assert_eq!(frames, vec!["{\"a\":1}"]);
    }

    #[test]
    fn done_sentinel_stops_decoding() {
        let mut d = FrameDecoder::new();
        let frames = d.push("data: {\"a\":1}\n\ndata: [DONE]\n\ndata: {\"b\":2}\n\n");
        assert_eq!(frames, vec!["{\"a\":1}"]);
        assert!(d.is_done());
        assert!(d.push("data: {\"c\":3}\n\n").is_empty());
    }

    #[test]
    fn done_sentinel_whitespace_tolerant() {
        let mut d = FrameDecoder::new();
        assert!(d.push("data:   [DONE]  \n\n").is_empty());
        assert!(d.is_done());
    }

    #[test]
    fn incomplete_trailing_fragment_is_buffered() {
        let mut d = FrameDecoder::new();
        assert!(d.push("data: {\"a\":1}").is_empty());
        assert!(d.push("\n").is_empty());
        let frames = d.push("\n");
        assert_eq!(frames, vec!["{\"a\":1}"]);
    }

    #[test]
    fn utf8_chunker_reassembles_split_characters() {
        // "خلاصہ" (Urdu for "summary") split mid-character.
        let text = "data: {\"message\":\"خلاصہ\"}\n\n".as_bytes();
        for split in 0..=text.len() {
            let mut c = Utf8Chunker::new();
            let mut s = c.push(&text[..split]);
            s.push_str(&c.push(&text[split..]));
            assert_eq!(s.as_bytes(), text, "split at byte {split}");
        }
    }

    #[test]
    fn utf8_chunker_replaces_invalid_bytes() {
        let mut chunker = Utf8Chunker::new();
        let out = chunker.push(&[b'a', 0xFF, b'b']);
        assert_eq!(out, "a\u{FFFD}b");
    }

    #[test]
    fn multiline_frame_without_data_prefix_on_first_line_discarded() {
        // Only frames whose text begins with "data:" are frame-worthy.
        let mut d = FrameDecoder::new();
        let frames = d.push("id: 7\ndata: {\"a\":1}\n\ndata: {\"b\":2}\n\n");
        assert_eq!(frames, vec!["{\"b\":2}"]);
    }
}
