//! HTTP/1.x codec: turning bytes into messages and messages into bytes.
//!
//! # Architecture
//!
//! - [`terminator`]: incremental `CRLF` / `CRLFCRLF` matching that survives
//!   terminators split across reads
//! - [`header`]: line framing, header block parsing and head encoding
//! - [`body`]: chunked, fixed-length and close-delimited body decoding
//! - [`RequestDecoder`] and [`ResponseDecoder`]: [`tokio_util::codec::Decoder`]
//!   implementations assembling the pieces above
//!
//! The decoders never block; they are fed by whatever owns the bytes, usually
//! a [`SocketChannel`](crate::connection::SocketChannel).
//!
//! # Example
//!
//! ```
//! use stream_wire::codec::ResponseDecoder;
//! use stream_wire::protocol::Frame;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = ResponseDecoder::new();
//! let mut buffer = BytesMut::from(&b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok"[..]);
//!
//! let Some(Frame::Head(response)) = decoder.decode(&mut buffer).unwrap() else { unreachable!() };
//! assert_eq!(response.status_code(), 200);
//! ```

pub mod body;
pub mod header;
pub mod terminator;

mod request_decoder;
mod response_decoder;

pub use header::HeadEncoder;
pub use request_decoder::RequestDecoder;
pub use response_decoder::ResponseDecoder;
