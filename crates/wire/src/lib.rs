//! Blocking HTTP/1.x message framing for streaming clients
//!
//! This crate parses and serializes HTTP/1.x requests and responses, and moves
//! them over plain blocking sockets. It is the wire layer underneath a
//! playlist-driven media client: fetch a playlist, fetch its segments, and
//! hand the body bytes to a player as they arrive.
//!
//! # Features
//!
//! - Request and response heads with case-sensitive, name ordered headers
//! - Chunked, `Content-Length` and close-delimited bodies
//! - End-of-headers detection across arbitrarily split reads
//! - Streaming body delivery to a caller supplied sink
//! - Synchronous [`tokio_util::codec::Decoder`] implementations for use with
//!   any byte source
//!
//! # Example
//!
//! ```no_run
//! use http::Uri;
//! use stream_wire::config::ChannelConfig;
//! use stream_wire::context::WireContext;
//! use tracing::{Level, info};
//!
//! let mut context = WireContext::new(ChannelConfig::default()).with_max_level(Level::DEBUG);
//! context.initialize();
//!
//! let uri: Uri = "http://media.example.com/live/index.m3u8".parse().unwrap();
//! let response = context.fetch(&uri).unwrap();
//! info!(status = response.status_code(), len = response.body().len(), "playlist fetched");
//!
//! let segment: Uri = "http://media.example.com/live/seg-1.ts".parse().unwrap();
//! context
//!     .fetch_to(&segment, |bytes| {
//!         // feed the player
//!         let _ = bytes;
//!     })
//!     .unwrap();
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: message types, headers and errors
//! - [`codec`]: framing, body decoding and encoding over [`bytes::BytesMut`]
//! - [`connection`]: blocking socket transport built on the codec
//! - [`context`]: caller-owned context with idempotent logging setup
//! - [`config`]: buffer sizes, limits and timeouts
//!
//! ## Error Handling
//!
//! - [`protocol::HttpError`]: Top-level error type
//! - [`protocol::ParseError`]: malformed or incomplete messages
//! - [`protocol::TransportError`]: socket failures, stalls and closed peers
//!
//! `Request::parse` and `Response::parse` return `None` on failure; their
//! `try_parse` siblings keep the reason.
//!
//! # Limitations
//!
//! - HTTP/1.x only, no TLS
//! - One thread per connection, no keep-alive reuse
//! - Header names are matched case-sensitively

pub mod codec;
pub mod config;
pub mod connection;
pub mod context;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
