//! HTTP request decoder module
//!
//! [`RequestDecoder`] turns buffered bytes into [`Request`] heads, one per
//! call once the whole head has arrived. Bytes following the head stay in the
//! buffer.
//!
//! # Example
//!
//! ```
//! use stream_wire::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from(&b"GET /live.m3u8 HTTP/1.1\r\nHost: example.org\r\n\r\n"[..]);
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(request.target(), "/live.m3u8");
//! ```

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::config::DEFAULT_MAX_HEADER_BYTES;
use crate::ensure;
use crate::protocol::{ParseError, Request};

/// A decoder for HTTP request heads.
///
/// Heads longer than `max_header_bytes` are rejected with
/// [`ParseError::TooLargeHeader`] instead of being buffered without bound.
#[derive(Debug, Clone, Copy)]
pub struct RequestDecoder {
    max_header_bytes: usize,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_max_header_bytes(max_header_bytes: usize) -> Self {
        Self { max_header_bytes }
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::with_max_header_bytes(DEFAULT_MAX_HEADER_BYTES)
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Attempts to decode an HTTP request head from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: a complete head was consumed from `src`
    /// - `Ok(None)`: need more data to proceed
    /// - `Err(_)`: encountered a parsing error
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match Request::parse_head(src) {
            Ok((request, head_len)) => {
                ensure!(
                    head_len <= self.max_header_bytes,
                    ParseError::too_large_header(head_len, self.max_header_bytes)
                );
                src.advance(head_len);
                trace!(method = request.method(), target = request.target(), head_len, "decoded request head");
                Ok(Some(request))
            }
            Err(ParseError::Incomplete) => {
                ensure!(
                    src.len() <= self.max_header_bytes,
                    ParseError::too_large_header(src.len(), self.max_header_bytes)
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
