//! HTTP body decoding.
//!
//! A body is framed in one of four ways, chosen from the message head:
//!
//! - [`ChunkedDecoder`]: chunked transfer encoding, one size line per chunk
//! - [`LengthDecoder`]: exactly `Content-Length` bytes
//! - until the connection closes, when neither of the above applies
//! - no body at all, for `1xx`, `204` and `304` responses
//!
//! [`PayloadDecoder`] wraps the strategies behind one [`tokio_util::codec::Decoder`].

mod chunked_decoder;
mod length_decoder;
mod payload_decoder;

pub use chunked_decoder::{ChunkedDecoder, decode_next_chunk_size};
pub use length_decoder::LengthDecoder;
pub use payload_decoder::PayloadDecoder;
