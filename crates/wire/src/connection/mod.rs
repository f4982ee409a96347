//! Blocking byte transport for HTTP/1.x messages.
//!
//! - [`SocketChannel`]: reads and writes whole messages over one stream,
//!   detecting the head/body boundary across arbitrarily sized reads
//! - [`SocketListener`]: accepts peers and wraps each in a [`SocketChannel`]
//! - [`HeaderBoundary`]: the incremental end-of-headers detector
//!
//! There is no async runtime here: each channel blocks its calling thread,
//! so serving several peers means one thread per connection.

mod boundary;
mod listener;
mod socket_channel;

pub use boundary::{HeaderBoundary, find_header_boundary};
pub use listener::SocketListener;
pub use socket_channel::SocketChannel;
