//! HTTP response decoder module
//!
//! [`ResponseDecoder`] yields a [`Frame::Head`] with the parsed [`Response`]
//! first, then the body as a sequence of [`Frame::Payload`] items ending with
//! [`PayloadItem::Eof`]. The body framing comes from
//! [`Response::payload_size`].

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::body::PayloadDecoder;
use crate::config::DEFAULT_MAX_HEADER_BYTES;
use crate::ensure;
use crate::protocol::{Frame, ParseError, PayloadItem, Response};

/// A decoder for HTTP responses that handles both head and payload
///
/// The decoder maintains its state through the `payload_decoder` field:
/// - `None`: currently parsing the head
/// - `Some(PayloadDecoder)`: currently parsing the payload
#[derive(Debug, Clone)]
pub struct ResponseDecoder {
    max_header_bytes: usize,
    payload_decoder: Option<PayloadDecoder>,
}

impl ResponseDecoder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_max_header_bytes(max_header_bytes: usize) -> Self {
        Self { max_header_bytes, payload_decoder: None }
    }

    /// Returns true while the body of the last decoded head is being read.
    pub fn in_payload(&self) -> bool {
        self.payload_decoder.is_some()
    }

    fn on_payload(&mut self, item: Option<PayloadItem>) -> Option<Frame<Response>> {
        match item {
            Some(item @ PayloadItem::Chunk(_)) => Some(Frame::Payload(item)),
            Some(item @ PayloadItem::Eof) => {
                // the next bytes belong to a new response
                self.payload_decoder.take();
                Some(Frame::Payload(item))
            }
            None => None,
        }
    }
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self::with_max_header_bytes(DEFAULT_MAX_HEADER_BYTES)
    }
}

impl Decoder for ResponseDecoder {
    type Item = Frame<Response>;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(payload_decoder) = &mut self.payload_decoder {
            let item = payload_decoder.decode(src)?;
            return Ok(self.on_payload(item));
        }

        match Response::parse_head(src) {
            Ok((response, head_len)) => {
                ensure!(
                    head_len <= self.max_header_bytes,
                    ParseError::too_large_header(head_len, self.max_header_bytes)
                );
                src.advance(head_len);

                let payload_size = response.payload_size();
                trace!(status = response.status_code(), ?payload_size, "decoded response head");
                self.payload_decoder = Some(PayloadDecoder::from_size(payload_size));
                Ok(Some(Frame::Head(response)))
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

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(payload_decoder) = &mut self.payload_decoder {
            let item = payload_decoder.decode_eof(src)?;
            return Ok(self.on_payload(item));
        }

        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None if src.is_empty() => Ok(None),
            None => Err(ParseError::Incomplete),
        }
    }
}
