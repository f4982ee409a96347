//! Caller-owned entry point tying configuration and logging together.
//!
//! Nothing in this crate holds global state. A [`WireContext`] is created by
//! the application, optionally initialized once to install a `tracing`
//! subscriber, and then used to open channels and fetch resources.

use bytes::{Bytes, BytesMut};
use http::Uri;
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use crate::config::ChannelConfig;
use crate::connection::SocketChannel;
use crate::protocol::{HttpError, Request, Response, TransportError};

/// Shared settings for every channel opened through it.
#[derive(Debug, Clone)]
pub struct WireContext {
    config: ChannelConfig,
    max_level: Level,
    initialized: bool,
}

impl WireContext {
    pub fn new(config: ChannelConfig) -> Self {
        Self { config, max_level: Level::INFO, initialized: false }
    }

    /// Sets the most verbose level the subscriber installed by
    /// [`WireContext::initialize`] lets through.
    pub fn with_max_level(mut self, max_level: Level) -> Self {
        self.max_level = max_level;
        self
    }

    /// Installs a formatting `tracing` subscriber as the global default.
    ///
    /// Calling it again is a no-op. When the application already installed
    /// its own subscriber, that one is kept.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }

        let subscriber = FmtSubscriber::builder().with_max_level(self.max_level).finish();
        match tracing::subscriber::set_global_default(subscriber) {
            Ok(()) => info!(max_level = %self.max_level, "installed tracing subscriber"),
            Err(e) => debug!(cause = %e, "keeping existing tracing subscriber"),
        }

        self.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub fn connect(&self, host: &str, port: u16) -> Result<SocketChannel, TransportError> {
        SocketChannel::connect_with(host, port, self.config.clone())
    }

    /// GETs `uri` and returns the response with its whole body.
    pub fn fetch(&self, uri: &Uri) -> Result<Response, HttpError> {
        let mut body = BytesMut::new();
        let mut response = self.fetch_to(uri, |bytes| body.extend_from_slice(&bytes))?;
        response.set_body(body.freeze());
        Ok(response)
    }

    /// GETs `uri` and streams the body into `sink`. The returned response
    /// carries the head only.
    pub fn fetch_to<F>(&self, uri: &Uri, sink: F) -> Result<Response, HttpError>
    where
        F: FnMut(Bytes),
    {
        let mut channel = SocketChannel::connect_uri(uri, &self.config)?;
        channel.send_request(&Request::for_uri(uri))?;

        let response = channel.receive_response_head()?;
        let len = channel.receive_body_with(&response, sink)?;
        debug!(%uri, status = response.status_code(), len, "fetched");
        Ok(response)
    }
}

impl Default for WireContext {
    fn default() -> Self {
        Self::new(ChannelConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::SocketListener;
    use std::thread;

    #[test]
    fn initialize_is_idempotent() {
        let mut context = WireContext::default().with_max_level(Level::DEBUG);
        assert!(!context.is_initialized());

        context.initialize();
        context.initialize();
        assert!(context.is_initialized());

        // a second context finds the subscriber already installed
        let mut other = WireContext::default();
        other.initialize();
        assert!(other.is_initialized());
    }

    #[test]
    fn fetch_reads_chunked_body() {
        let listener = SocketListener::bind_with("127.0.0.1:0", ChannelConfig::default()).unwrap();
        let port = listener.local_port().unwrap();

        let server = thread::spawn(move || {
            let (mut channel, _) = listener.accept().unwrap();
            let request = channel.receive_request().unwrap();
            assert_eq!(request.target(), "/seg/1.ts?q=1");
            assert_eq!(request.host(), format!("127.0.0.1:{port}"));

            let mut response = Response::new(200, None, "HTTP/1.1");
            response.set_header("Transfer-Encoding", "chunked");
            channel.send_response(&response).unwrap();
            channel.write_all(b"4\r\nWiki\r\n5;ext=1\r\npedia\r\n0\r\n\r\n").unwrap();
        });

        let context = WireContext::default();
        let uri: Uri = format!("http://127.0.0.1:{port}/seg/1.ts?q=1").parse().unwrap();
        let response = context.fetch(&uri).unwrap();
        server.join().unwrap();

        assert!(response.is_chunked());
        assert_eq!(&response.body()[..], b"Wikipedia");
    }

    #[test]
    fn fetch_to_streams_fragments() {
        let listener = SocketListener::bind_with("127.0.0.1:0", ChannelConfig::default()).unwrap();
        let port = listener.local_port().unwrap();

        let server = thread::spawn(move || {
            let (mut channel, _) = listener.accept().unwrap();
            channel.receive_request().unwrap();

            // no Content-Length: the body runs until the connection closes
            let mut response = Response::new(200, None, "HTTP/1.0");
            response.set_body(&b"raw media bytes"[..]);
            channel.send_response(&response).unwrap();
        });

        let context = WireContext::default();
        let uri: Uri = format!("http://127.0.0.1:{port}/stream").parse().unwrap();

        let mut received = Vec::new();
        let response = context.fetch_to(&uri, |bytes| received.extend_from_slice(&bytes)).unwrap();
        server.join().unwrap();

        assert_eq!(response.content_length(), -1);
        assert!(response.body().is_empty());
        assert_eq!(received, b"raw media bytes");
    }
}
