//! HTTP head framing and encoding.
//!
//! - [`find_line`] and [`parse_header_block`] split received bytes into lines
//!   and header fields, reporting [`ParseError::Incomplete`](crate::protocol::ParseError::Incomplete)
//!   while the head is still arriving
//! - [`HeadEncoder`] renders a [`Request`](crate::protocol::Request) or
//!   [`Response`](crate::protocol::Response) into a send buffer

mod header_decoder;
mod header_encoder;

pub use header_decoder::{find_line, parse_header_block};
pub use header_encoder::HeadEncoder;
