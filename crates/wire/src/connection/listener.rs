use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};

use tracing::{error, info};

use crate::config::ChannelConfig;
use crate::connection::socket_channel::apply_timeouts;
use crate::connection::SocketChannel;
use crate::protocol::TransportError;

/// Blocking listener handing out one [`SocketChannel`] per accepted peer.
#[derive(Debug)]
pub struct SocketListener {
    inner: TcpListener,
    config: ChannelConfig,
}

impl SocketListener {
    /// Listens on every interface at `port`; port `0` picks a free one.
    pub fn bind(port: u16) -> Result<Self, TransportError> {
        Self::bind_with(("0.0.0.0", port), ChannelConfig::default())
    }

    pub fn bind_with<A: ToSocketAddrs>(addr: A, config: ChannelConfig) -> Result<Self, TransportError> {
        let inner = TcpListener::bind(addr).map_err(|e| {
            error!(cause = %e, "bind failed");
            TransportError::failure("can't bind listener", e)
        })?;

        let listener = Self { inner, config };
        info!(port = listener.local_port()?, "start listening");
        Ok(listener)
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        self.inner.local_addr().map_err(|e| TransportError::failure("can't read local address", e))
    }

    pub fn local_port(&self) -> Result<u16, TransportError> {
        self.local_addr().map(|addr| addr.port())
    }

    /// Blocks until a peer connects.
    pub fn accept(&self) -> Result<(SocketChannel<TcpStream>, SocketAddr), TransportError> {
        let (stream, remote_addr) = self.inner.accept().map_err(|e| {
            error!(cause = %e, "failed to accept");
            TransportError::failure("can't accept connection", e)
        })?;

        apply_timeouts(&stream, &self.config)?;
        info!(%remote_addr, "accepted connection");
        Ok((SocketChannel::with_config(stream, self.config.clone()), remote_addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Request, Response};
    use std::thread;

    #[test]
    fn accept_and_answer() {
        let listener = SocketListener::bind_with("127.0.0.1:0", ChannelConfig::default()).unwrap();
        let port = listener.local_port().unwrap();
        assert_ne!(port, 0);

        let client = thread::spawn(move || {
            let mut channel = SocketChannel::connect("127.0.0.1", port).unwrap();
            let mut request = Request::create_default_get_request("/status");
            request.set_host(format!("127.0.0.1:{port}"));
            channel.send_request(&request).unwrap();
            channel.receive_response().unwrap()
        });

        let (mut channel, _) = listener.accept().unwrap();
        let request = channel.receive_request().unwrap();
        assert_eq!(request.target(), "/status");

        let mut response = Response::create_standard_response(0, 404, None, "HTTP/1.1");
        response.set_header("X-Target", request.target());
        channel.send_response(&response).unwrap();
        drop(channel);

        let response = client.join().unwrap();
        assert_eq!(response.status_code(), 404);
        assert_eq!(response.status_description(), "Not Found");
        assert_eq!(response.header("X-Target"), Some("/status"));
        assert!(response.body().is_empty());
    }
}
