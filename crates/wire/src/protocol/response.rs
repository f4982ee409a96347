//! HTTP response messages.
//!
//! Parsing covers the status line and header block only; body bytes are
//! attached afterwards by whoever reads them off the connection, see
//! [`SocketChannel::receive_response`](crate::connection::SocketChannel::receive_response).

use std::fmt;

use bytes::Bytes;
use tracing::debug;

use crate::codec::header::{find_line, parse_header_block};
use crate::codec::terminator::LINE_END;
use crate::ensure;
use crate::protocol::{CRLF, HeaderStore, ParseError, PayloadSize};

pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_ENCODING: &str = "Content-Encoding";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const TRANSFER_ENCODING: &str = "Transfer-Encoding";
pub const CONNECTION: &str = "Connection";
pub const DATE: &str = "Date";
pub const SERVER: &str = "Server";

const CHUNKED: &str = "chunked";
const SERVER_NAME: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Description used for status codes missing from the lookup table.
pub const UNRECOGNIZED_STATUS: &str = "Code not implemented/recognized";

/// Returns the description sent for `status_code` when none is given.
pub fn default_status_description(status_code: u16) -> &'static str {
    match status_code {
        200 => "OK",
        400 => "Bad request",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal server error",
        501 => "Not implemented",
        503 => "Service unavailable",
        _ => UNRECOGNIZED_STATUS,
    }
}

/// The current time formatted for a `Date` header, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn http_date() -> String {
    let mut buf = faf_http_date::get_date_buff_no_key();
    faf_http_date::get_date_no_key(&mut buf);
    String::from_utf8_lossy(&buf[..]).into_owned()
}

/// An HTTP/1.x response: status line, headers and, once received, the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    version: String,
    status_code: u16,
    status_description: String,
    is_chunked: bool,
    headers: HeaderStore,
    body: Bytes,
}

impl Response {
    /// Builds an outbound response.
    ///
    /// When `status_description` is `None` the description comes from
    /// [`default_status_description`]. The response is non-persistent and
    /// carries `Content-Type`, `Server`, `Connection` and `Date` headers.
    pub fn new(status_code: u16, status_description: Option<&str>, version: &str) -> Self {
        let status_description = status_description.unwrap_or_else(|| default_status_description(status_code));

        let mut response = Self {
            version: version.to_owned(),
            status_code,
            status_description: status_description.to_owned(),
            is_chunked: false,
            headers: HeaderStore::new(),
            body: Bytes::new(),
        };

        response.set_header(CONTENT_TYPE, "text/html");
        response.set_header(SERVER, SERVER_NAME);
        response.set_header(CONNECTION, "close");
        response.set_header(DATE, http_date());
        response
    }

    /// Builds a response for a body of `content_length` identity encoded bytes.
    pub fn create_standard_response(
        content_length: u64,
        status_code: u16,
        status_description: Option<&str>,
        version: &str,
    ) -> Self {
        let mut response = Self::new(status_code, status_description, version);

        response.set_header(CONTENT_ENCODING, "identity");
        response.set_header(TRANSFER_ENCODING, "identity");
        response.set_header(CONNECTION, "close");
        response.set_header(DATE, http_date());
        response.set_header(CONTENT_LENGTH, content_length.to_string());
        response
    }

    /// Parses a response head, returning `None` for malformed or incomplete input.
    pub fn parse(buf: &[u8]) -> Option<Self> {
        match Self::try_parse(buf) {
            Ok(response) => Some(response),
            Err(e) => {
                debug!(cause = %e, "discarding unparsable response");
                None
            }
        }
    }

    /// Parses a response head, reporting why parsing failed.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Incomplete`] if the status line or header block is cut short
    /// - [`ParseError::MalformedFirstLine`] if the status line has fewer than two spaces
    /// - [`ParseError::InvalidStatusCode`] unless the code is an integer in `100..=599`
    /// - [`ParseError::MalformedHeaderLine`] for a header line without `:`
    pub fn try_parse(buf: &[u8]) -> Result<Self, ParseError> {
        Self::parse_head(buf).map(|(response, _)| response)
    }

    /// Parses a response head and returns it with the number of bytes it spans.
    pub(crate) fn parse_head(buf: &[u8]) -> Result<(Self, usize), ParseError> {
        let first_line_len = find_line(buf).ok_or(ParseError::Incomplete)?;
        let status_line = String::from_utf8_lossy(&buf[..first_line_len - LINE_END.len()]);

        let (version, rest) = status_line
            .split_once(' ')
            .ok_or_else(|| ParseError::malformed_first_line(format!("missing status code in {status_line:?}")))?;
        let (code, description) = rest
            .split_once(' ')
            .ok_or_else(|| ParseError::malformed_first_line(format!("missing status description in {status_line:?}")))?;

        let status_code = parse_status_code(code)?;
        let (headers, headers_len) = parse_header_block(&buf[first_line_len..])?;

        let is_chunked = headers.get(TRANSFER_ENCODING).is_some_and(|value| value.contains(CHUNKED));

        let response = Self {
            version: version.to_owned(),
            status_code,
            status_description: description.to_owned(),
            is_chunked,
            headers,
            body: Bytes::new(),
        };

        Ok((response, first_line_len + headers_len))
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn set_version<V: Into<String>>(&mut self, version: V) {
        self.version = version.into();
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn status_description(&self) -> &str {
        &self.status_description
    }

    pub fn set_status<D: Into<String>>(&mut self, status_code: u16, status_description: D) {
        self.status_code = status_code;
        self.status_description = status_description.into();
    }

    /// Whether the parsed `Transfer-Encoding` header mentioned `chunked`.
    pub fn is_chunked(&self) -> bool {
        self.is_chunked
    }

    pub fn headers(&self) -> &HeaderStore {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderStore {
        &mut self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn set_header<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        self.headers.set(name, value);
    }

    /// The `Content-Length` header as an integer, or `-1` when it is missing
    /// or not a valid length.
    pub fn content_length(&self) -> i64 {
        self.headers
            .get(CONTENT_LENGTH)
            .and_then(|value| value.trim().parse::<u64>().ok())
            .and_then(|length| i64::try_from(length).ok())
            .unwrap_or(-1)
    }

    /// Decides how the body following this head is framed.
    pub fn payload_size(&self) -> PayloadSize {
        if self.is_chunked {
            return PayloadSize::Chunked;
        }

        if matches!(self.status_code, 100..=199 | 204 | 304) {
            return PayloadSize::Empty;
        }

        match u64::try_from(self.content_length()) {
            Ok(length) => PayloadSize::Length(length),
            Err(_) => PayloadSize::UntilClose,
        }
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn set_body<B: Into<Bytes>>(&mut self, body: B) {
        self.body = body.into();
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Renders the status line followed by the header block. The body is not
    /// included.
    pub fn serialize(&self) -> String {
        let mut out = format!("{} {} {}{CRLF}", self.version, self.status_code, self.status_description);
        self.headers.write_to(&mut out);
        out
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

fn parse_status_code(code: &str) -> Result<u16, ParseError> {
    ensure!(!code.is_empty() && code.bytes().all(|b| b.is_ascii_digit()), ParseError::invalid_status_code(code));

    let status_code = code.parse::<u16>().map_err(|_| ParseError::invalid_status_code(code))?;
    ensure!((100..=599).contains(&status_code), ParseError::invalid_status_code(code));
    Ok(status_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn crlf(text: &str) -> String {
        text.replace('\n', "\r\n")
    }

    #[test]
    fn parse_status_line_and_headers() {
        let text = crlf(indoc! {"
        HTTP/1.1 404 Not Found Here
        Content-Length: 42
        Content-Type: text/html

        "});

        let response = Response::parse(text.as_bytes()).unwrap();

        assert_eq!(response.version(), "HTTP/1.1");
        assert_eq!(response.status_code(), 404);
        assert_eq!(response.status_description(), "Not Found Here");
        assert!(!response.is_chunked());
        assert_eq!(response.content_length(), 42);
        assert_eq!(response.payload_size(), PayloadSize::Length(42));
        assert!(response.body().is_empty());
    }

    #[test]
    fn status_code_boundaries() {
        let parse = |code: &str| Response::parse(format!("HTTP/1.1 {code} X\r\n\r\n").as_bytes());

        assert!(parse("099").is_none());
        assert!(parse("600").is_none());
        assert!(parse("abc").is_none());
        assert!(parse("").is_none());
        assert!(parse("+200").is_none());
        assert_eq!(parse("100").unwrap().status_code(), 100);
        assert_eq!(parse("599").unwrap().status_code(), 599);
    }

    #[test]
    fn invalid_status_code_error() {
        match Response::try_parse(b"HTTP/1.1 600 Nope\r\n\r\n") {
            Err(ParseError::InvalidStatusCode(code)) => assert_eq!(code, "600"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn status_line_needs_two_spaces() {
        assert!(matches!(Response::try_parse(b"HTTP/1.1 200\r\n\r\n"), Err(ParseError::MalformedFirstLine { .. })));
    }

    #[test]
    fn incomplete_head() {
        let result = Response::try_parse(b"HTTP/1.1 200 OK\r\nContent-Length: 1\r\n");
        assert!(matches!(result, Err(ParseError::Incomplete)));
        assert!(matches!(Response::try_parse(b"HTTP/1.1 200 O"), Err(ParseError::Incomplete)));
    }

    #[test]
    fn chunked_detection() {
        let response = Response::parse(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: gzip, chunked\r\n\r\n").unwrap();
        assert!(response.is_chunked());
        assert_eq!(response.payload_size(), PayloadSize::Chunked);

        let response = Response::parse(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: identity\r\n\r\n").unwrap();
        assert!(!response.is_chunked());
        assert_eq!(response.payload_size(), PayloadSize::UntilClose);
    }

    #[test]
    fn content_length_sentinel() {
        let response = Response::parse(b"HTTP/1.1 200 OK\r\n\r\n").unwrap();
        assert_eq!(response.content_length(), -1);

        let response = Response::parse(b"HTTP/1.1 200 OK\r\nContent-Length: ten\r\n\r\n").unwrap();
        assert_eq!(response.content_length(), -1);

        let response = Response::parse(b"HTTP/1.1 200 OK\r\nContent-Length: -5\r\n\r\n").unwrap();
        assert_eq!(response.content_length(), -1);
    }

    #[test]
    fn bodiless_statuses() {
        let response = Response::parse(b"HTTP/1.1 304 Not Modified\r\nContent-Length: 10\r\n\r\n").unwrap();
        assert_eq!(response.payload_size(), PayloadSize::Empty);
    }

    #[test]
    fn standard_response_headers() {
        let response = Response::create_standard_response(1024, 200, None, "HTTP/1.1");

        assert_eq!(response.status_description(), "OK");
        assert_eq!(response.header(CONTENT_ENCODING), Some("identity"));
        assert_eq!(response.header(TRANSFER_ENCODING), Some("identity"));
        assert_eq!(response.header(CONNECTION), Some("close"));
        assert_eq!(response.header(CONTENT_LENGTH), Some("1024"));
        assert_eq!(response.content_length(), 1024);

        let date = response.header(DATE).unwrap();
        assert_eq!(date.len(), 29);
        assert!(date.ends_with(" GMT"));
    }

    #[test]
    fn default_descriptions_apply_only_without_explicit_one() {
        assert_eq!(Response::new(403, None, "HTTP/1.1").status_description(), "Forbidden");
        assert_eq!(Response::new(503, None, "HTTP/1.1").status_description(), "Service unavailable");
        assert_eq!(Response::new(418, None, "HTTP/1.1").status_description(), UNRECOGNIZED_STATUS);
        assert_eq!(Response::new(418, Some("I'm a teapot"), "HTTP/1.0").status_description(), "I'm a teapot");
    }

    #[test]
    fn serialize_then_parse() {
        let mut response = Response::create_standard_response(5, 200, Some("OK"), "HTTP/1.1");
        response.set_body(&b"hello"[..]);

        let text = response.serialize();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\nConnection: close\r\nContent-Encoding: identity\r\n"));
        assert!(text.ends_with("\r\n\r\n"));

        let parsed = Response::parse(text.as_bytes()).unwrap();
        assert_eq!(parsed.status_code(), 200);
        assert_eq!(parsed.headers(), response.headers());
        assert!(parsed.body().is_empty());
    }
}
