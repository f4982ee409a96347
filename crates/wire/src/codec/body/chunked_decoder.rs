//! Decoder implementation for HTTP chunked transfer encoding.
//!
//! This module provides functionality to decode HTTP messages that use chunked transfer encoding
//! as specified in [RFC 7230 Section 4.1](https://tools.ietf.org/html/rfc7230#section-4.1).
//!
//! The chunked encoding allows the sender to transmit message data in a series of chunks,
//! indicating the size of each chunk before its data.
//!
//! [`decode_next_chunk_size`] handles a single size line. [`ChunkedDecoder`]
//! drives it over a whole body: it reads chunk data, checks the `CRLF` after
//! each chunk, stops at the zero-size chunk and discards any trailer lines.

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::header::find_line;
use crate::codec::terminator::LINE_END;
use crate::protocol::{ParseError, PayloadItem};

use ChunkedState::{Body, BodyEnd, End, Size, Trailer};

/// Reads the chunk size line at the front of `buf`.
///
/// The leading hexadecimal digits give the size. Anything after them on the
/// same line, such as a `;name=value` chunk extension, is skipped without
/// being interpreted. On success the whole size line, terminator included, is
/// removed from `buf`, leaving it positioned at the chunk data.
///
/// A returned size of `0` is the last chunk; consuming the trailer section
/// that follows it is up to the caller.
///
/// Returns `Ok(None)` when `buf` does not yet hold a complete line, in which
/// case `buf` is left untouched.
///
/// # Errors
///
/// [`ParseError::InvalidChunkSize`] when the line does not start with a hex
/// digit or the size overflows a `u64`. `buf` is left untouched.
pub fn decode_next_chunk_size(buf: &mut BytesMut) -> Result<Option<u64>, ParseError> {
    let Some(line_len) = find_line(buf) else {
        return Ok(None);
    };

    let line = &buf[..line_len - LINE_END.len()];
    let digits = line.iter().take_while(|b| b.is_ascii_hexdigit()).count();
    if digits == 0 {
        return Err(ParseError::invalid_chunk_size(format!("no hex digits in {:?}", String::from_utf8_lossy(line))));
    }

    let mut size: u64 = 0;
    for &b in &line[..digits] {
        // is_ascii_hexdigit above guarantees to_digit succeeds
        let digit = u64::from(char::from(b).to_digit(16).unwrap_or_default());
        size = size
            .checked_mul(16)
            .and_then(|size| size.checked_add(digit))
            .ok_or_else(|| ParseError::invalid_chunk_size("chunk size overflow"))?;
    }

    if digits < line.len() {
        trace!(extension = %String::from_utf8_lossy(&line[digits..]), "skipping chunk extension");
    }

    buf.advance(line_len);
    Ok(Some(size))
}

/// A decoder for handling HTTP chunked transfer encoding.
///
/// The decoder processes incoming bytes according to the chunked format:
/// - Each chunk starts with its size in hexadecimal
/// - Followed by optional extensions and CRLF
/// - Then the chunk data and CRLF
/// - A zero-sized chunk indicates the end of the message, optionally followed
///   by trailer lines and a final CRLF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedDecoder {
    state: ChunkedState,
    remaining_size: u64,
}

impl ChunkedDecoder {
    /// Creates a new ChunkedDecoder instance.
    ///
    /// The decoder starts in the Size state, ready to read the size of the first chunk.
    pub fn new() -> Self {
        Self { state: Size, remaining_size: 0 }
    }

    /// Returns true once the zero-size chunk and the trailer section were consumed.
    pub fn is_finished(&self) -> bool {
        self.state == End
    }
}

impl Default for ChunkedDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkedState {
    /// Read the chunk size line
    Size,
    /// Read chunk data
    Body,
    /// Read CRLF after chunk data
    BodyEnd,
    /// Skip trailer lines until the empty line
    Trailer,
    /// Final state after reading last chunk
    End,
}

impl Decoder for ChunkedDecoder {
    type Item = PayloadItem;
    type Error = ParseError;

    /// Decodes chunked transfer encoded data from the input buffer.
    ///
    /// # Returns
    /// - `Ok(Some(PayloadItem::Chunk(bytes)))` when chunk data is available
    /// - `Ok(Some(PayloadItem::Eof))` when the final chunk is processed
    /// - `Ok(None)` when more data is needed
    /// - `Err(ParseError)` if the chunked encoding is invalid
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            match self.state {
                Size => {
                    let Some(size) = decode_next_chunk_size(src)? else {
                        return Ok(None);
                    };
                    trace!(size, "read chunk size");
                    self.remaining_size = size;
                    self.state = if size == 0 { Trailer } else { Body };
                }

                Body => {
                    if src.is_empty() {
                        return Ok(None);
                    }

                    // cap remaining bytes at the max capacity of usize
                    let remaining = usize::try_from(self.remaining_size).unwrap_or(usize::MAX);
                    let read_size = remaining.min(src.len());

                    self.remaining_size -= read_size as u64;
                    if self.remaining_size == 0 {
                        self.state = BodyEnd;
                    }

                    let bytes = src.split_to(read_size).freeze();
                    trace!(len = bytes.len(), "read chunked bytes");
                    return Ok(Some(PayloadItem::Chunk(bytes)));
                }

                BodyEnd => {
                    if src.len() < LINE_END.len() {
                        return Ok(None);
                    }
                    if &src[..LINE_END.len()] != LINE_END {
                        return Err(ParseError::invalid_body("missing CRLF after chunk data"));
                    }
                    src.advance(LINE_END.len());
                    self.state = Size;
                }

                Trailer => {
                    let Some(line_len) = find_line(src) else {
                        return Ok(None);
                    };
                    let line = src.split_to(line_len);
                    if line.len() == LINE_END.len() {
                        self.state = End;
                    } else {
                        let trailer = &line[..line.len() - LINE_END.len()];
                        trace!(trailer = %String::from_utf8_lossy(trailer), "discarding trailer");
                    }
                }

                End => {
                    trace!("finished reading chunked data");
                    return Ok(Some(PayloadItem::Eof));
                }
            }
        }
    }
}
