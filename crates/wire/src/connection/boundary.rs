//! Locating the end of the header block in a stream of arbitrarily sized reads.

use crate::codec::terminator::TerminatorMatcher;

/// Finds the `\r\n\r\n` that ends a message head while bytes keep arriving.
///
/// Each call to [`HeaderBoundary::advance`] only looks at the bytes appended
/// since the previous call, and a terminator split across two reads is still
/// found.
#[derive(Debug, Clone)]
pub struct HeaderBoundary {
    matcher: TerminatorMatcher,
    scanned: usize,
    found: Option<usize>,
}

impl HeaderBoundary {
    pub fn new() -> Self {
        Self { matcher: TerminatorMatcher::header_end(), scanned: 0, found: None }
    }

    /// Scans the unseen tail of `buf` and returns the offset just past the
    /// end-of-headers marker, counted from the start of `buf`.
    ///
    /// `buf` must be the same, only growing, buffer on every call.
    pub fn advance(&mut self, buf: &[u8]) -> Option<usize> {
        if self.found.is_some() {
            return self.found;
        }

        let fresh = &buf[self.scanned.min(buf.len())..];
        match self.matcher.scan(fresh) {
            Some(len) => {
                self.found = Some(self.scanned + len);
                self.scanned += len;
            }
            None => self.scanned += fresh.len(),
        }
        self.found
    }

    /// Number of bytes examined so far.
    pub fn scanned(&self) -> usize {
        self.scanned
    }
}

impl Default for HeaderBoundary {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot form of [`HeaderBoundary`] over a complete buffer.
pub fn find_header_boundary(buf: &[u8]) -> Option<usize> {
    HeaderBoundary::new().advance(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_in_single_buffer() {
        let text = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok";
        assert_eq!(find_header_boundary(text), Some(text.len() - 2));
    }

    #[test]
    fn boundary_after_false_partial_match() {
        assert_eq!(find_header_boundary(b"X: y\r\n\r\r\n\r\nbody"), Some(11));
        assert_eq!(find_header_boundary(b"X: y\r\n\r"), None);
    }

    #[test]
    fn boundary_split_over_reads() {
        let mut buf = Vec::new();
        let mut boundary = HeaderBoundary::new();

        for part in [&b"HTTP/1.1 200 OK\r"[..], b"\nServer: x\r\n", b"\r", b"\nbody"] {
            buf.extend_from_slice(part);
            if let Some(offset) = boundary.advance(&buf) {
                assert_eq!(&buf[offset..], b"body");
                return;
            }
        }
        panic!("boundary not found");
    }

    #[test]
    fn found_offset_is_sticky() {
        let mut buf = b"A: b\r\n\r\n".to_vec();
        let mut boundary = HeaderBoundary::new();
        assert_eq!(boundary.advance(&buf), Some(8));

        buf.extend_from_slice(b"\r\n\r\n");
        assert_eq!(boundary.advance(&buf), Some(8));
        assert_eq!(boundary.scanned(), 8);
    }
}
