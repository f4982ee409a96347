use std::io::{self, ErrorKind, Read, Write};
use std::net::TcpStream;

use bytes::{Bytes, BytesMut};
use http::Uri;
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, error, info, trace, warn};

use crate::codec::body::PayloadDecoder;
use crate::codec::{HeadEncoder, RequestDecoder};
use crate::config::ChannelConfig;
use crate::connection::boundary::HeaderBoundary;
use crate::ensure;
use crate::protocol::{HttpError, ParseError, PayloadItem, Request, Response, TransportError};

/// Blocking HTTP/1.x transport over one byte stream.
///
/// `SocketChannel` owns its stream exclusively. Every operation blocks the
/// calling thread until data arrives, the peer closes, or an error occurs;
/// serving several peers at once takes one thread per channel.
///
/// Bytes read past the end of a message head are kept in the channel and
/// consumed first by the next read, so no body byte is ever lost between the
/// head and body phases.
///
/// # Type Parameters
///
/// * `S`: the byte stream, a [`TcpStream`] unless stated otherwise
#[derive(Debug)]
pub struct SocketChannel<S = TcpStream> {
    stream: S,
    config: ChannelConfig,
    pending: BytesMut,
}

impl SocketChannel<TcpStream> {
    /// Connects to `host:port` with the default [`ChannelConfig`].
    pub fn connect(host: &str, port: u16) -> Result<Self, TransportError> {
        Self::connect_with(host, port, ChannelConfig::default())
    }

    pub fn connect_with(host: &str, port: u16, config: ChannelConfig) -> Result<Self, TransportError> {
        let stream = TcpStream::connect((host, port)).map_err(|e| {
            error!(host, port, cause = %e, "connect failed");
            TransportError::failure(format!("can't connect to {host}:{port}"), e)
        })?;

        apply_timeouts(&stream, &config)?;
        info!(host, port, "connected");
        Ok(Self::with_config(stream, config))
    }

    /// Connects to the host named by `uri`, on its port or `config.default_port`.
    ///
    /// Only plain `http` uris are supported; a uri without a host is rejected.
    pub fn connect_uri(uri: &Uri, config: &ChannelConfig) -> Result<Self, TransportError> {
        if let Some(scheme) = uri.scheme_str()
            && scheme != "http"
        {
            return Err(TransportError::failure(
                format!("unsupported scheme in {uri}"),
                io::Error::from(ErrorKind::Unsupported),
            ));
        }

        let Some(host) = uri.host() else {
            return Err(TransportError::failure(format!("no host in {uri}"), io::Error::from(ErrorKind::InvalidInput)));
        };

        let port = uri.port_u16().unwrap_or(config.default_port);
        Self::connect_with(host, port, config.clone())
    }
}

impl<S> SocketChannel<S>
where
    S: Read + Write,
{
    pub fn new(stream: S) -> Self {
        Self::with_config(stream, ChannelConfig::default())
    }

    pub fn with_config(stream: S, config: ChannelConfig) -> Self {
        let pending = BytesMut::with_capacity(config.buffer_size);
        Self { stream, config, pending }
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Returns the stream, dropping any bytes read but not consumed yet.
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Reads one byte at a time into `out` until a line feed arrives or
    /// `max_len` bytes were read.
    ///
    /// Returns `0` when the peer closed, or went quiet past the read timeout,
    /// before sending a single byte; otherwise the number of bytes appended,
    /// line feed included.
    pub fn read_line(&mut self, out: &mut Vec<u8>, max_len: usize) -> Result<usize, TransportError> {
        let mut count = 0;
        while count < max_len {
            let Some(byte) = self.read_byte()? else {
                break;
            };
            out.push(byte);
            count += 1;
            if byte == b'\n' {
                break;
            }
        }
        Ok(count)
    }

    /// Appends exactly `n` bytes to `out`, unless the peer closes first.
    ///
    /// A close before `n` bytes is not an error: the short count is returned.
    pub fn read_exact(&mut self, out: &mut BytesMut, n: usize) -> Result<usize, TransportError> {
        let from_pending = n.min(self.pending.len());
        out.extend_from_slice(&self.pending.split_to(from_pending));

        let mut count = from_pending;
        while count < n {
            let read = read_into(&mut self.stream, out, n - count)?;
            if read == 0 {
                debug!(expected = n, actual = count, "peer closed before read_exact completed");
                break;
            }
            count += read;
        }
        Ok(count)
    }

    /// Performs a single read of at most `max_len` bytes into `out`.
    ///
    /// Returns `0` once the peer closed.
    pub fn read_some(&mut self, out: &mut BytesMut, max_len: usize) -> Result<usize, TransportError> {
        if !self.pending.is_empty() {
            let len = max_len.min(self.pending.len());
            out.extend_from_slice(&self.pending.split_to(len));
            return Ok(len);
        }
        read_into(&mut self.stream, out, max_len)
    }

    /// Reads into `buf` until it holds `capacity` bytes or contains the
    /// end-of-headers marker.
    ///
    /// Returns the offset just past the marker. `Ok(None)` means the buffer
    /// filled up, or the peer closed, without a marker.
    pub fn detect_header_boundary(
        &mut self,
        buf: &mut BytesMut,
        capacity: usize,
    ) -> Result<Option<usize>, TransportError> {
        let mut boundary = HeaderBoundary::new();

        loop {
            if let Some(offset) = boundary.advance(buf) {
                trace!(offset, buffered = buf.len(), "found end of headers");
                return Ok(Some(offset));
            }

            if buf.len() >= capacity {
                return Ok(None);
            }

            let remaining = capacity - buf.len();
            if self.read_some(buf, remaining)? == 0 {
                debug!(buffered = buf.len(), "peer closed before end of headers");
                return Ok(None);
            }
        }
    }

    /// Reads a message head plus whatever body bytes arrived along with it.
    ///
    /// The head must fit in `config.buffer_size` bytes. The returned header
    /// text ends with the blank line; the body prefix may be empty or partial.
    pub fn read_header_and_partial_body(&mut self) -> Result<(String, BytesMut), TransportError> {
        let capacity = self.config.buffer_size;
        let mut buf = BytesMut::with_capacity(capacity);

        let Some(offset) = self.detect_header_boundary(&mut buf, capacity)? else {
            if buf.is_empty() {
                return Err(TransportError::Closed);
            }
            if buf.len() < capacity {
                warn!(buffered = buf.len(), "peer closed inside message head");
                return Err(TransportError::truncated_head(buf.len()));
            }
            warn!(capacity, buffered = buf.len(), "no end of headers within buffer");
            return Err(TransportError::header_boundary_not_found(capacity));
        };

        let body_prefix = buf.split_off(offset);
        let header_text = String::from_utf8_lossy(&buf).into_owned();
        Ok((header_text, body_prefix))
    }

    /// Accumulates request lines until the blank line, then parses the head.
    ///
    /// Empty reads are tolerated up to `config.stall_limit` in a row; any byte
    /// of progress resets the count. The head may not grow past
    /// `config.max_header_bytes`, with or without line feeds in it.
    pub fn receive_request(&mut self) -> Result<Request, HttpError> {
        let mut decoder = RequestDecoder::with_max_header_bytes(self.config.max_header_bytes);
        let mut head = Vec::new();
        let mut empty_reads = 0;

        loop {
            let max_header_bytes = self.config.max_header_bytes;
            ensure!(
                head.len() < max_header_bytes,
                ParseError::too_large_header(head.len(), max_header_bytes).into()
            );

            let budget = self.config.max_line_len.min(max_header_bytes - head.len());
            let read = self.read_line(&mut head, budget)?;
            if read == 0 {
                empty_reads += 1;
                if empty_reads >= self.config.stall_limit {
                    warn!(attempts = empty_reads, buffered = head.len(), "request stalled");
                    return Err(TransportError::stalled(empty_reads).into());
                }
                continue;
            }
            empty_reads = 0;

            if !head.ends_with(b"\n") {
                continue;
            }

            let mut buf = BytesMut::from(&head[..]);
            if let Some(request) = decoder.decode(&mut buf)? {
                debug!(method = request.method(), target = request.target(), "received request");
                return Ok(request);
            }
        }
    }

    /// Reads a response head, leaving any body bytes in the channel for
    /// [`SocketChannel::receive_body_with`].
    pub fn receive_response_head(&mut self) -> Result<Response, HttpError> {
        let (header_text, body_prefix) = self.read_header_and_partial_body()?;

        let response = Response::try_parse(header_text.as_bytes()).inspect_err(|e| {
            warn!(cause = %e, "discarding malformed response head");
        })?;

        // earlier leftovers were consumed by the head read
        self.pending = body_prefix;
        debug!(status = response.status_code(), chunked = response.is_chunked(), "received response head");
        Ok(response)
    }

    /// Reads a whole response, body included.
    pub fn receive_response(&mut self) -> Result<Response, HttpError> {
        let mut response = self.receive_response_head()?;

        let mut body = BytesMut::new();
        self.receive_body_with(&response, |bytes| body.extend_from_slice(&bytes))?;

        response.set_body(body.freeze());
        Ok(response)
    }

    /// Reads the body announced by `response` and hands each fragment to
    /// `sink` as soon as it was decoded. Returns the number of body bytes.
    ///
    /// The framing follows [`Response::payload_size`]: chunked coding,
    /// `Content-Length` bytes, nothing, or everything until the peer closes.
    pub fn receive_body_with<F>(&mut self, response: &Response, mut sink: F) -> Result<u64, HttpError>
    where
        F: FnMut(Bytes),
    {
        let mut decoder = PayloadDecoder::from_size(response.payload_size());
        let mut buf = std::mem::take(&mut self.pending);
        let mut closed = false;
        let mut total = 0u64;

        let result: Result<u64, HttpError> = loop {
            let item = if closed { decoder.decode_eof(&mut buf) } else { decoder.decode(&mut buf) };

            match item {
                Ok(Some(PayloadItem::Chunk(bytes))) => {
                    total += bytes.len() as u64;
                    sink(bytes);
                }
                Ok(Some(PayloadItem::Eof)) => break Ok(total),
                Ok(None) if closed => break Err(ParseError::invalid_body("connection closed inside body").into()),
                Ok(None) => match read_into(&mut self.stream, &mut buf, self.config.buffer_size) {
                    Ok(0) => closed = true,
                    Ok(_) => {}
                    Err(e) => break Err(e.into()),
                },
                Err(e) => break Err(e.into()),
            }
        };

        self.pending = buf;
        if let Ok(total) = &result {
            trace!(total, "received body");
        }
        result
    }

    pub fn send_request(&mut self, request: &Request) -> Result<(), TransportError> {
        let mut dst = BytesMut::new();
        HeadEncoder.encode(request, &mut dst)?;
        self.write_all(&dst)?;
        debug!(method = request.method(), target = request.target(), "sent request");
        Ok(())
    }

    /// Sends the response head followed by its body.
    pub fn send_response(&mut self, response: &Response) -> Result<(), TransportError> {
        let mut dst = BytesMut::new();
        HeadEncoder.encode(response, &mut dst)?;
        self.write_all(&dst)?;
        debug!(status = response.status_code(), body = response.body().len(), "sent response");
        Ok(())
    }

    pub fn write_all(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.stream.write_all(bytes).and_then(|()| self.stream.flush()).map_err(|e| {
            error!(len = bytes.len(), cause = %e, "write failed");
            TransportError::failure("write failed", e)
        })
    }

    /// Next byte, from leftovers first. `None` on close or read timeout.
    fn read_byte(&mut self) -> Result<Option<u8>, TransportError> {
        if !self.pending.is_empty() {
            let byte = self.pending.split_to(1);
            return Ok(Some(byte[0]));
        }

        let mut byte = [0u8; 1];
        loop {
            match self.stream.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) if is_timeout(&e) => return Ok(None),
                Err(e) => {
                    error!(cause = %e, "read failed");
                    return Err(TransportError::failure("read failed", e));
                }
            }
        }
    }
}

/// One read of at most `max_len` bytes appended to `out`.
fn read_into<S: Read>(stream: &mut S, out: &mut BytesMut, max_len: usize) -> Result<usize, TransportError> {
    let start = out.len();
    out.resize(start + max_len, 0);

    let result = loop {
        match stream.read(&mut out[start..]) {
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            other => break other,
        }
    };

    match result {
        Ok(read) => {
            out.truncate(start + read);
            trace!(read, "read bytes");
            Ok(read)
        }
        Err(e) => {
            out.truncate(start);
            error!(cause = %e, "read failed");
            Err(TransportError::failure("read failed", e))
        }
    }
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}

pub(crate) fn apply_timeouts(stream: &TcpStream, config: &ChannelConfig) -> Result<(), TransportError> {
    stream
        .set_read_timeout(config.read_timeout)
        .and_then(|()| stream.set_write_timeout(config.write_timeout))
        .map_err(|e| TransportError::failure("can't set socket timeouts", e))
}
