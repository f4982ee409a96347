//! Line and header block framing.
//!
//! HTTP/1.x heads are sequences of `CRLF` terminated lines. [`find_line`]
//! locates the end of the next line in a byte buffer, and
//! [`parse_header_block`] assembles header lines into a [`HeaderStore`] until
//! the bare `CRLF` that ends the block.
//!
//! Both functions work on whatever bytes have arrived so far. Running out of
//! bytes is reported as [`ParseError::Incomplete`], which the caller retries
//! once more data is available; a header line without a `:` is reported as
//! [`ParseError::MalformedHeaderLine`] and is final.

use tracing::trace;

use crate::codec::terminator::{LINE_END, TerminatorMatcher};
use crate::protocol::{HEADER_DELIMITER, HeaderStore, ParseError};

/// Characters removed from both ends of a header value.
const BLANKS: &[char] = &[' ', '\t', '\r', '\n'];

/// Returns the offset just past the first `CRLF` in `buf`, or `None` when the
/// buffer ends before a complete terminator.
pub fn find_line(buf: &[u8]) -> Option<usize> {
    TerminatorMatcher::line_end().scan(buf)
}

/// Parses header lines from the start of `buf` up to and including the empty
/// line that ends the block.
///
/// On success returns the headers and the number of bytes consumed, so the
/// caller can locate the first body byte.
///
/// # Errors
///
/// - [`ParseError::Incomplete`] when `buf` ends before the end-of-headers line
/// - [`ParseError::MalformedHeaderLine`] on the first line lacking a `:`
pub fn parse_header_block(buf: &[u8]) -> Result<(HeaderStore, usize), ParseError> {
    let mut headers = HeaderStore::new();
    let mut offset = 0;

    loop {
        let rest = &buf[offset..];
        let Some(line_len) = find_line(rest) else {
            trace!(parsed = headers.len(), buffered = rest.len(), "header block incomplete");
            return Err(ParseError::Incomplete);
        };

        let line = &rest[..line_len - LINE_END.len()];
        offset += line_len;

        if line.is_empty() {
            trace!(headers = headers.len(), len = offset, "parsed header block");
            return Ok((headers, offset));
        }

        let (name, value) = split_header_line(line)?;
        headers.set(name, value);
    }
}

/// Splits one header line (without its terminator) at the first `:`.
fn split_header_line(line: &[u8]) -> Result<(String, String), ParseError> {
    let line = String::from_utf8_lossy(line);
    let Some(delimiter) = line.find(HEADER_DELIMITER as char) else {
        return Err(ParseError::malformed_header_line(line));
    };

    let name = &line[..delimiter];
    let value = trim_value(&line[delimiter + 1..]);
    Ok((name.to_owned(), value.to_owned()))
}

/// Keeps the inclusive range from the first to the last non-blank character.
/// A value made only of blanks becomes empty.
fn trim_value(value: &str) -> &str {
    value.trim_matches(BLANKS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn crlf(text: &str) -> String {
        text.replace('\n', "\r\n")
    }

    #[test]
    fn find_line_returns_offset_past_terminator() {
        assert_eq!(find_line(b"Host: x\r\nAccept: */*\r\n"), Some(9));
        assert_eq!(find_line(b"\r\n"), Some(2));
    }

    #[test]
    fn find_line_incomplete() {
        assert_eq!(find_line(b""), None);
        assert_eq!(find_line(b"Host: x"), None);
        assert_eq!(find_line(b"Host: x\r"), None);
        assert_eq!(find_line(b"Host: x\n"), None);
    }

    #[test]
    fn parses_block_and_reports_consumed_len() {
        let block = "Host: example.org\r\nAccept: */*\r\n\r\nbody";

        let (headers, len) = parse_header_block(block.as_bytes()).unwrap();

        assert_eq!(len, block.len() - 4);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("Host"), Some("example.org"));
        assert_eq!(headers.get("Accept"), Some("*/*"));
    }

    #[test]
    fn parses_realistic_block() {
        let block = crlf(indoc! {"
        Content-Type: video/MP2T
        Content-Length: 42
        Cache-Control: max-age=0
        X-Empty:    

        "});

        let (headers, len) = parse_header_block(block.as_bytes()).unwrap();

        assert_eq!(len, block.len());
        assert_eq!(headers.get("Content-Type"), Some("video/MP2T"));
        assert_eq!(headers.get("Content-Length"), Some("42"));
        assert_eq!(headers.get("Cache-Control"), Some("max-age=0"));
        assert_eq!(headers.get("X-Empty"), Some(""));
    }

    #[test]
    fn value_keeps_last_character() {
        let (headers, _) = parse_header_block(b"Server:\t nginx/1.2 \t\r\nX: y\r\n\r\n").unwrap();
        assert_eq!(headers.get("Server"), Some("nginx/1.2"));
        assert_eq!(headers.get("X"), Some("y"));
    }

    #[test]
    fn value_keeps_inner_delimiters() {
        let (headers, _) = parse_header_block(b"Host: 127.0.0.1:8080\r\n\r\n").unwrap();
        assert_eq!(headers.get("Host"), Some("127.0.0.1:8080"));
    }

    #[test]
    fn missing_end_of_headers_is_incomplete() {
        let result = parse_header_block(b"Host: x\r\nAccept: */*\r\n");
        assert!(matches!(result, Err(ParseError::Incomplete)));

        let result = parse_header_block(b"Host: x\r\nAcc");
        assert!(matches!(result, Err(ParseError::Incomplete)));
    }

    #[test]
    fn line_without_delimiter_is_malformed() {
        let result = parse_header_block(b"Host: x\r\nnot a header\r\n\r\n");
        match result {
            Err(ParseError::MalformedHeaderLine { line }) => assert_eq!(line, "not a header"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_block() {
        let (headers, len) = parse_header_block(b"\r\nrest").unwrap();
        assert!(headers.is_empty());
        assert_eq!(len, 2);
    }

    #[test]
    fn trim_value_uses_inclusive_range() {
        assert_eq!(trim_value(" a "), "a");
        assert_eq!(trim_value("abc"), "abc");
        assert_eq!(trim_value(" \t "), "");
        assert_eq!(trim_value(""), "");
        assert_eq!(trim_value("  héllo wörld  "), "héllo wörld");
    }
}
