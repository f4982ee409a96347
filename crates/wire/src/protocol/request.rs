//! HTTP request messages.
//!
//! A [`Request`] is either parsed from received bytes with [`Request::parse`]
//! or built field by field for sending, usually through
//! [`Request::create_get_request`] or [`Request::for_uri`].

use std::fmt;

use http::Uri;
use tracing::debug;

use crate::codec::header::{find_line, parse_header_block};
use crate::codec::terminator::LINE_END;
use crate::protocol::{CRLF, HeaderStore, ParseError};

pub const HOST: &str = "Host";

const DEFAULT_VERSION: &str = "HTTP/1.1";
const ABSOLUTE_PREFIX: &str = "http://";

/// An HTTP/1.x request head: the request line plus its headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: String,
    target: String,
    version: String,
    headers: HeaderStore,
}

impl Request {
    pub fn new<M, T, V>(method: M, target: T, version: V) -> Self
    where
        M: Into<String>,
        T: Into<String>,
        V: Into<String>,
    {
        Self { method: method.into(), target: target.into(), version: version.into(), headers: HeaderStore::new() }
    }

    /// Builds a `GET` request for `path`. An empty path requests `/`.
    pub fn create_get_request(path: &str, version: &str) -> Self {
        let path = if path.is_empty() { "/" } else { path };
        Self::new("GET", path, version)
    }

    /// Same as [`Request::create_get_request`] with `HTTP/1.1`.
    pub fn create_default_get_request(path: &str) -> Self {
        Self::create_get_request(path, DEFAULT_VERSION)
    }

    /// Builds a `GET` request addressed to `uri`.
    ///
    /// The target is the path and query of the uri, the `Host` header is the
    /// uri host plus `:port` when the uri names a port explicitly.
    pub fn for_uri(uri: &Uri) -> Self {
        let target = uri.path_and_query().map_or("/", |pq| pq.as_str());
        let mut request = Self::create_default_get_request(target);

        if let Some(host) = uri.host() {
            match uri.port_u16() {
                Some(port) => request.set_host(format!("{host}:{port}")),
                None => request.set_host(host),
            }
        }

        request
    }

    /// Parses a request head, returning `None` for malformed or incomplete input.
    pub fn parse(buf: &[u8]) -> Option<Self> {
        match Self::try_parse(buf) {
            Ok(request) => Some(request),
            Err(e) => {
                debug!(cause = %e, "discarding unparsable request");
                None
            }
        }
    }

    /// Parses a request head, reporting why parsing failed.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Incomplete`] if the request line or header block is cut short
    /// - [`ParseError::MalformedFirstLine`] if the request line has fewer than two spaces
    /// - [`ParseError::MalformedHeaderLine`] for a header line without `:`
    pub fn try_parse(buf: &[u8]) -> Result<Self, ParseError> {
        Self::parse_head(buf).map(|(request, _)| request)
    }

    /// Parses a request head and returns it with the number of bytes it spans.
    pub(crate) fn parse_head(buf: &[u8]) -> Result<(Self, usize), ParseError> {
        let first_line_len = find_line(buf).ok_or(ParseError::Incomplete)?;
        let first_line = String::from_utf8_lossy(&buf[..first_line_len - LINE_END.len()]);

        let (method, rest) = first_line
            .split_once(' ')
            .ok_or_else(|| ParseError::malformed_first_line(format!("missing target in {first_line:?}")))?;
        let (target, version) = rest
            .split_once(' ')
            .ok_or_else(|| ParseError::malformed_first_line(format!("missing version in {first_line:?}")))?;

        let (headers, headers_len) = parse_header_block(&buf[first_line_len..])?;

        let mut request = Self::new(method, "", version.trim_end_matches(['\r', '\n']));
        request.headers = headers;
        request.target = normalize_target(target, request.host());

        Ok((request, first_line_len + headers_len))
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn set_method<M: Into<String>>(&mut self, method: M) {
        self.method = method.into();
    }

    /// The request target, relative to the server once parsed.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn set_target<T: Into<String>>(&mut self, target: T) {
        self.target = target.into();
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn set_version<V: Into<String>>(&mut self, version: V) {
        self.version = version.into();
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

    /// The `Host` header, or an empty string when absent.
    pub fn host(&self) -> &str {
        self.headers.get(HOST).unwrap_or_default()
    }

    pub fn set_host<H: Into<String>>(&mut self, host: H) {
        self.headers.set(HOST, host);
    }

    /// Rebuilds the absolute url from the `Host` header and the target.
    pub fn url(&self) -> String {
        format!("{ABSOLUTE_PREFIX}{}{}", self.host(), self.target)
    }

    /// Renders the request line followed by the header block.
    pub fn serialize(&self) -> String {
        let mut out = format!("{} {} {}{CRLF}", self.method, self.target, self.version);
        self.headers.write_to(&mut out);
        out
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

/// Recovers a server relative target from an absolute form one.
///
/// A leading `http://` is dropped, then the first occurrence of the host
/// text is removed wherever it appears. This is a plain text replacement: a
/// path that repeats the host name loses that occurrence too.
fn normalize_target(target: &str, host: &str) -> String {
    let mut target = target.strip_prefix(ABSOLUTE_PREFIX).unwrap_or(target).to_owned();

    if !host.is_empty() {
        if let Some(pos) = target.find(host) {
            target.replace_range(pos..pos + host.len(), "");
        }
    }

    if target.is_empty() { "/".to_owned() } else { target }
}
