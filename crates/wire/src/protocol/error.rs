use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("parse error: {source}")]
    ParseError {
        #[from]
        source: ParseError,
    },

    #[error("transport error: {source}")]
    TransportError {
        #[from]
        source: TransportError,
    },
}

/// Failures produced while turning bytes into a [`Request`](crate::protocol::Request)
/// or [`Response`](crate::protocol::Response).
///
/// [`ParseError::Incomplete`] is the only retryable variant: the same parse
/// should be attempted again once more bytes have arrived.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed first line: {reason}")]
    MalformedFirstLine { reason: String },

    #[error("malformed header line: {line:?}")]
    MalformedHeaderLine { line: String },

    #[error("incomplete message, need more bytes")]
    Incomplete,

    #[error("invalid status code: {0:?}")]
    InvalidStatusCode(String),

    #[error("invalid chunk size: {reason}")]
    InvalidChunkSize { reason: String },

    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn malformed_first_line<S: ToString>(str: S) -> Self {
        Self::MalformedFirstLine { reason: str.to_string() }
    }

    pub fn malformed_header_line<S: ToString>(line: S) -> Self {
        Self::MalformedHeaderLine { line: line.to_string() }
    }

    pub fn invalid_status_code<S: ToString>(code: S) -> Self {
        Self::InvalidStatusCode(code.to_string())
    }

    pub fn invalid_chunk_size<S: ToString>(str: S) -> Self {
        Self::InvalidChunkSize { reason: str.to_string() }
    }

    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn invalid_body<S: ToString>(str: S) -> Self {
        Self::InvalidBody { reason: str.to_string() }
    }

    /// Returns true when the input was well formed so far but ended early.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::Incomplete)
    }
}

/// Failures of the byte transport underneath a [`SocketChannel`](crate::connection::SocketChannel).
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{reason}: {source}")]
    Failure {
        reason: String,
        #[source]
        source: io::Error,
    },

    #[error("no end of headers found within {capacity} bytes")]
    HeaderBoundaryNotFound { capacity: usize },

    #[error("connection closed after {buffered} bytes of an unfinished message head")]
    TruncatedHead { buffered: usize },

    #[error("peer stalled after {attempts} empty reads")]
    Stalled { attempts: usize },

    #[error("connection closed by peer")]
    Closed,
}

impl TransportError {
    pub fn failure<S: ToString>(reason: S, source: io::Error) -> Self {
        Self::Failure { reason: reason.to_string(), source }
    }

    pub fn header_boundary_not_found(capacity: usize) -> Self {
        Self::HeaderBoundaryNotFound { capacity }
    }

    pub fn truncated_head(buffered: usize) -> Self {
        Self::TruncatedHead { buffered }
    }

    pub fn stalled(attempts: usize) -> Self {
        Self::Stalled { attempts }
    }
}

impl From<io::Error> for TransportError {
    fn from(source: io::Error) -> Self {
        Self::failure("io error", source)
    }
}
