//! Serializes message heads, and response bodies, into a [`BytesMut`].
//!
//! The wire format is the one produced by [`Request::serialize`] and
//! [`Response::serialize`]: start line, one `name: value` line per header in
//! name order, then the blank line. For responses the body bytes follow as is;
//! the encoder never adds or rewrites framing headers.

use std::io;
use std::io::Write;

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;
use tracing::trace;

use crate::protocol::{Message, Request, Response, TransportError};

/// Initial buffer size allocated for head serialization
const INIT_HEADER_SIZE: usize = 4 * 1024;

/// Encoder for outgoing messages implementing the [`Encoder`] trait.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadEncoder;

impl Encoder<&Request> for HeadEncoder {
    type Error = TransportError;

    fn encode(&mut self, request: &Request, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let start = dst.len();
        write!(FastWrite(dst), "{} {} {}\r\n", request.method(), request.target(), request.version())?;
        request.headers().write_bytes(dst);
        trace!(len = dst.len() - start, "encoded request head");
        Ok(())
    }
}

impl Encoder<&Response> for HeadEncoder {
    type Error = TransportError;

    /// Writes the response head followed by its body.
    fn encode(&mut self, response: &Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let start = dst.len();
        dst.reserve(INIT_HEADER_SIZE + response.body().len());
        write!(
            FastWrite(dst),
            "{} {} {}\r\n",
            response.version(),
            response.status_code(),
            response.status_description()
        )?;
        response.headers().write_bytes(dst);
        dst.put_slice(response.body());
        trace!(len = dst.len() - start, body = response.body().len(), "encoded response");
        Ok(())
    }
}

impl Encoder<&Message> for HeadEncoder {
    type Error = TransportError;

    fn encode(&mut self, message: &Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match message {
            Message::Request(request) => self.encode(request, dst),
            Message::Response(response) => self.encode(response, dst),
        }
    }
}

/// Adapts a `BytesMut` to [`io::Write`] so `write!` can format straight into it.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
