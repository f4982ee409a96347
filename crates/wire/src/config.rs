//! Tunables for a [`SocketChannel`](crate::connection::SocketChannel).

use std::time::Duration;

/// Capacity of the one-shot read that must contain the whole response head.
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Longest line [`SocketChannel::read_line`](crate::connection::SocketChannel::read_line) collects by default.
pub const DEFAULT_MAX_LINE_LEN: usize = 8 * 1024;

/// Largest head the streaming decoders accept.
pub const DEFAULT_MAX_HEADER_BYTES: usize = 8 * 1024;

/// Consecutive empty reads after which a peer is considered stalled.
pub const DEFAULT_STALL_LIMIT: usize = 1000;

pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Settings applied to every channel opened with them.
///
/// ```
/// use std::time::Duration;
/// use stream_wire::config::ChannelConfig;
///
/// let config = ChannelConfig::default()
///     .with_buffer_size(16 * 1024)
///     .with_read_timeout(Some(Duration::from_secs(5)));
/// assert_eq!(config.buffer_size, 16 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    pub buffer_size: usize,
    pub max_line_len: usize,
    pub max_header_bytes: usize,
    pub stall_limit: usize,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
    pub default_port: u16,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            max_header_bytes: DEFAULT_MAX_HEADER_BYTES,
            stall_limit: DEFAULT_STALL_LIMIT,
            read_timeout: None,
            write_timeout: None,
            default_port: DEFAULT_HTTP_PORT,
        }
    }
}

impl ChannelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len;
        self
    }

    pub fn with_max_header_bytes(mut self, max_header_bytes: usize) -> Self {
        self.max_header_bytes = max_header_bytes;
        self
    }

    pub fn with_stall_limit(mut self, stall_limit: usize) -> Self {
        self.stall_limit = stall_limit;
        self
    }

    pub fn with_read_timeout(mut self, read_timeout: Option<Duration>) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    pub fn with_write_timeout(mut self, write_timeout: Option<Duration>) -> Self {
        self.write_timeout = write_timeout;
        self
    }

    pub fn with_default_port(mut self, default_port: u16) -> Self {
        self.default_port = default_port;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ChannelConfig::new();
        assert_eq!(config.buffer_size, 8192);
        assert_eq!(config.stall_limit, 1000);
        assert_eq!(config.default_port, 80);
        assert_eq!(config.read_timeout, None);
    }

    #[test]
    fn setters_chain() {
        let config = ChannelConfig::new().with_stall_limit(3).with_default_port(8080).with_max_line_len(64);
        assert_eq!(config.stall_limit, 3);
        assert_eq!(config.default_port, 8080);
        assert_eq!(config.max_line_len, 64);
        assert_eq!(config.max_header_bytes, DEFAULT_MAX_HEADER_BYTES);
    }
}
