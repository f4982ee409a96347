//! Decoder implementation for HTTP message payloads.
//!
//! This module provides a unified decoder for handling different types of HTTP message bodies:
//! - Content-Length based payloads
//! - Chunked transfer encoding
//! - Bodies delimited by the peer closing the connection
//! - Messages with no body
//!
//! [`PayloadDecoder::from_size`] picks the strategy from the [`PayloadSize`]
//! a response head announces.

use crate::codec::body::chunked_decoder::ChunkedDecoder;
use crate::codec::body::length_decoder::LengthDecoder;
use crate::protocol::{ParseError, PayloadItem, PayloadSize};
use bytes::BytesMut;
use tokio_util::codec::Decoder;

/// A unified decoder for handling HTTP message payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadDecoder {
    /// The specific decoding strategy to use
    kind: Kind,
}

/// Enum representing different payload decoding strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    /// Decode payload with a fixed content length
    Length(LengthDecoder),

    /// Decode payload using chunked transfer encoding
    Chunked(ChunkedDecoder),

    /// Everything until the connection closes is body
    UntilClose { finished: bool },

    /// Handle messages with no body
    NoBody,
}

impl PayloadDecoder {
    /// Creates a PayloadDecoder for messages with no body.
    pub fn empty() -> Self {
        Self { kind: Kind::NoBody }
    }

    /// Creates a PayloadDecoder for chunked transfer encoding.
    pub fn chunked() -> Self {
        Self { kind: Kind::Chunked(ChunkedDecoder::new()) }
    }

    /// Creates a PayloadDecoder for a fixed-length payload of `size` bytes.
    pub fn fix_length(size: u64) -> Self {
        Self { kind: Kind::Length(LengthDecoder::new(size)) }
    }

    /// Creates a PayloadDecoder that reads until the connection is closed.
    pub fn until_close() -> Self {
        Self { kind: Kind::UntilClose { finished: false } }
    }

    pub fn from_size(size: PayloadSize) -> Self {
        match size {
            PayloadSize::Length(n) => Self::fix_length(n),
            PayloadSize::Chunked => Self::chunked(),
            PayloadSize::UntilClose => Self::until_close(),
            PayloadSize::Empty => Self::empty(),
        }
    }

    /// Returns whether this decoder handles chunked transfer encoding.
    pub fn is_chunked(&self) -> bool {
        matches!(self.kind, Kind::Chunked(_))
    }

    /// Returns whether this decoder handles messages with no body.
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, Kind::NoBody)
    }

    /// Returns whether this decoder handles fixed-length payloads.
    pub fn is_fix_length(&self) -> bool {
        matches!(self.kind, Kind::Length(_))
    }

    pub fn is_until_close(&self) -> bool {
        matches!(self.kind, Kind::UntilClose { .. })
    }

    /// Bytes still expected for a fixed-length payload.
    pub fn remaining(&self) -> Option<u64> {
        match &self.kind {
            Kind::Length(length_decoder) => Some(length_decoder.remaining()),
            _ => None,
        }
    }
}

impl Decoder for PayloadDecoder {
    type Item = PayloadItem;
    type Error = ParseError;

    /// Delegates to the specific decoder, returns EOF immediately for
    /// no-body messages and passes buffered bytes through for close-delimited ones.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match &mut self.kind {
            Kind::Length(length_decoder) => length_decoder.decode(src),
            Kind::Chunked(chunked_decoder) => chunked_decoder.decode(src),
            Kind::UntilClose { finished: true } => Ok(Some(PayloadItem::Eof)),
            Kind::UntilClose { finished: false } => {
                if src.is_empty() {
                    return Ok(None);
                }
                Ok(Some(PayloadItem::Chunk(src.split().freeze())))
            }
            Kind::NoBody => Ok(Some(PayloadItem::Eof)),
        }
    }

    /// Called once the peer closed the connection.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match &mut self.kind {
            Kind::Length(length_decoder) => length_decoder.decode_eof(src),
            Kind::Chunked(chunked_decoder) => match chunked_decoder.decode(src)? {
                Some(item) => Ok(Some(item)),
                None => Err(ParseError::invalid_body("connection closed inside chunked body")),
            },
            Kind::UntilClose { finished } => {
                if !src.is_empty() {
                    return Ok(Some(PayloadItem::Chunk(src.split().freeze())));
                }
                *finished = true;
                Ok(Some(PayloadItem::Eof))
            }
            Kind::NoBody => Ok(Some(PayloadItem::Eof)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_size_selects_strategy() {
        assert!(PayloadDecoder::from_size(PayloadSize::Chunked).is_chunked());
        assert!(PayloadDecoder::from_size(PayloadSize::Empty).is_empty());
        assert!(PayloadDecoder::from_size(PayloadSize::UntilClose).is_until_close());

        let decoder = PayloadDecoder::from_size(PayloadSize::Length(12));
        assert!(decoder.is_fix_length());
        assert_eq!(decoder.remaining(), Some(12));
    }

    #[test]
    fn no_body_is_immediately_eof() {
        let mut buffer = BytesMut::from(&b"HTTP/1.1 200 OK\r\n"[..]);
        let mut decoder = PayloadDecoder::empty();

        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_eof());
        assert_eq!(buffer.len(), 17);
    }

    #[test]
    fn until_close_passes_everything_through() {
        let mut decoder = PayloadDecoder::until_close();
        let mut buffer = BytesMut::from(&b"first"[..]);

        let item = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(item.as_bytes().unwrap().as_ref(), b"first");
        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        buffer.extend_from_slice(b"last");
        let item = decoder.decode_eof(&mut buffer).unwrap().unwrap();
        assert_eq!(item.as_bytes().unwrap().as_ref(), b"last");

        assert!(decoder.decode_eof(&mut buffer).unwrap().unwrap().is_eof());
        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_eof());
    }

    #[test]
    fn chunked_cut_short_is_error() {
        let mut decoder = PayloadDecoder::chunked();
        let mut buffer = BytesMut::from(&b"5\r\nhel"[..]);

        assert!(decoder.decode_eof(&mut buffer).unwrap().unwrap().is_chunk());
        assert!(decoder.decode_eof(&mut buffer).is_err());
    }
}
