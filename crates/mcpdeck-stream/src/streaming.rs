use std::fmt::Display;
use std::pin::Pin;

use futures::{Stream, StreamExt};
use mcpdeck_types::StreamChunk;
use reqwest::Response;

use crate::buffer_utils::CircularLineBuffer;
use crate::record::decode_line;

/// Lazy, single-pass sequence of decoded chunks
pub type ChunkStream = Pin<Box<dyn Stream<Item = StreamChunk> + Send>>;

/// Per-stream session state of the interpreter
///
/// Holds the raw bytes of the unfinished line and whether the stream is
/// currently inside a web search tool call.
pub struct ChunkDecoder {
    buffer: CircularLineBuffer,
    is_buffering: bool,
}

impl ChunkDecoder {
    pub fn new() -> Self {
        Self {
            buffer: CircularLineBuffer::with_capacity(8192),
            is_buffering: false,
        }
    }

    /// Feed raw bytes and return the chunks of every line they complete
    pub fn push(&mut self, bytes: &[u8]) -> Vec<StreamChunk> {
        self.buffer.extend(bytes);

        let mut chunks = Vec::new();
        while let Some(line) = self.buffer.next_line() {
            self.decode_into(line, &mut chunks);
        }
        chunks
    }

    /// Decode the unterminated tail once the source has closed
    pub fn finish(&mut self) -> Vec<StreamChunk> {
        let mut chunks = Vec::new();
        if let Some(line) = self.buffer.take_remaining() {
            self.decode_into(line, &mut chunks);
        }
        chunks
    }

    /// True between a web search tool call and its result
    pub fn is_buffering(&self) -> bool {
        self.is_buffering
    }

    fn decode_into(&mut self, line: anyhow::Result<String>, chunks: &mut Vec<StreamChunk>) {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping undecodable stream line");
                return;
            }
        };

        if let Some(chunk) = decode_line(&line) {
            self.observe(&chunk);
            chunks.push(chunk);
        }
    }

    fn observe(&mut self, chunk: &StreamChunk) {
        if chunk.is_web_search_call() {
            self.is_buffering = true;
        } else if chunk.is_web_search_result() {
            self.is_buffering = false;
        }
    }
}

impl Default for ChunkDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpret a byte stream as a stream of chunks
///
/// The returned stream owns `source`; dropping it at any point releases the
/// underlying reader. A read error mid-stream is surfaced as an error chunk
/// and ends the stream.
pub fn decode_chunk_stream<S, B, E>(source: S) -> ChunkStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut source = Box::pin(source);
        let mut decoder = ChunkDecoder::new();

        while let Some(next) = source.next().await {
            match next {
                Ok(bytes) => {
                    for chunk in decoder.push(bytes.as_ref()) {
                        yield chunk;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Stream read failed");
                    yield StreamChunk::error(format!("Stream error: {}", e));
                    return;
                }
            }
        }

        for chunk in decoder.finish() {
            yield chunk;
        }

        tracing::debug!("Event stream closed");
    })
}

/// Interpret the body of an HTTP response as a stream of chunks
pub fn parse_chunk_stream(response: Response) -> ChunkStream {
    decode_chunk_stream(response.bytes_stream())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decoder_tracks_web_search_window() {
        let mut decoder = ChunkDecoder::new();

        decoder.push(b"{\"type\":\"tool-input-start\",\"toolCallId\":\"s1\",\"toolName\":\"web_search_preview\"}\n");
        assert!(decoder.is_buffering());

        decoder.push(b"{\"type\":\"text-delta\",\"delta\":\"x\"}\n");
        assert!(decoder.is_buffering());

        decoder.push(b"{\"type\":\"tool-output-available\",\"toolCallId\":\"s1\",\"toolName\":\"web_search_preview\",\"output\":[]}\n");
        assert!(!decoder.is_buffering());
    }

    #[test]
    fn test_decoder_reassembles_split_lines() {
        let mut decoder = ChunkDecoder::new();

        assert!(decoder.push(b"data: {\"type\":\"text-de").is_empty());
        assert_eq!(
            decoder.push(b"lta\",\"delta\":\"ab\"}\n\n"),
            vec![StreamChunk::text("ab")]
        );
    }

    #[test]
    fn test_decoder_finish_flushes_tail() {
        let mut decoder = ChunkDecoder::new();

        assert!(decoder.push(b"0:tail").is_empty());
        assert_eq!(decoder.finish(), vec![StreamChunk::text("tail")]);
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn test_decoder_skips_bad_utf8_line() {
        let mut decoder = ChunkDecoder::new();

        let mut bytes = vec![0xff, b'\n'];
        bytes.extend_from_slice(b"{\"type\":\"tool-call\",\"toolCallId\":\"c\",\"toolName\":\"t\",\"args\":{}}\n");

        assert_eq!(decoder.push(&bytes), vec![StreamChunk::tool_call("c", "t", json!({}))]);
    }
}
