//! Incremental matcher for multi-byte terminators such as `CRLF` and `CRLFCRLF`.
//!
//! The matcher is fed one byte at a time and can be carried across reads, so a
//! terminator split over two buffers is still found. On a mismatch it falls
//! back to the longest prefix of the terminator that is also a suffix of the
//! bytes seen so far, instead of restarting from zero. This matters for
//! `\r\n\r\n`: in `\r\n\r\r\n\r\n` the third `\r` both breaks one candidate
//! and starts the next one.

/// The line terminator, `CR LF`.
pub const LINE_END: &[u8] = b"\r\n";

/// The end-of-headers marker, `CR LF CR LF`.
pub const HEADER_END: &[u8] = b"\r\n\r\n";

/// Tracks progress toward a fixed terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminatorMatcher {
    pattern: &'static [u8],
    matched: usize,
}

impl TerminatorMatcher {
    /// Creates a matcher for `pattern`, which must not be empty.
    pub const fn new(pattern: &'static [u8]) -> Self {
        assert!(!pattern.is_empty());
        Self { pattern, matched: 0 }
    }

    pub const fn line_end() -> Self {
        Self::new(LINE_END)
    }

    pub const fn header_end() -> Self {
        Self::new(HEADER_END)
    }

    /// Number of terminator bytes currently matched.
    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn is_complete(&self) -> bool {
        self.matched == self.pattern.len()
    }

    pub fn reset(&mut self) {
        self.matched = 0;
    }

    /// Feeds one byte and returns true once the whole terminator has been seen.
    ///
    /// Feeding after completion starts a new match.
    pub fn feed(&mut self, byte: u8) -> bool {
        if self.is_complete() {
            self.matched = self.border(self.matched);
        }

        let mut k = self.matched;
        loop {
            if self.pattern[k] == byte {
                self.matched = k + 1;
                break;
            }
            if k == 0 {
                self.matched = 0;
                break;
            }
            k = self.border(k);
        }

        self.is_complete()
    }

    /// Scans `bytes` and returns the offset just past the first completed
    /// terminator, continuing from any partial match left by a previous call.
    pub fn scan(&mut self, bytes: &[u8]) -> Option<usize> {
        bytes.iter().position(|&b| self.feed(b)).map(|idx| idx + 1)
    }

    /// Length of the longest proper prefix of `pattern[..len]` that is also its suffix.
    fn border(&self, len: usize) -> usize {
        let seen = &self.pattern[..len];
        (1..len).rev().find(|&n| seen[..n] == seen[len - n..]).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_line_end() {
        let mut matcher = TerminatorMatcher::line_end();
        assert_eq!(matcher.scan(b"GET / HTTP/1.1\r\nHost"), Some(16));
    }

    #[test]
    fn repeated_cr_before_lf() {
        let mut matcher = TerminatorMatcher::line_end();
        assert_eq!(matcher.scan(b"abc\r\r\n"), Some(6));
    }

    #[test]
    fn header_end_after_false_partial_match() {
        let mut matcher = TerminatorMatcher::header_end();
        // "\r\n\r" followed by "\r\n\r\n": the restart must reuse the last '\r'
        assert_eq!(matcher.scan(b"a\r\n\r\r\n\r\nbody"), Some(8));
    }

    #[test]
    fn header_end_split_across_scans() {
        let mut matcher = TerminatorMatcher::header_end();
        assert_eq!(matcher.scan(b"Host: x\r\n\r"), None);
        assert_eq!(matcher.matched(), 3);
        assert_eq!(matcher.scan(b"\nbody"), Some(1));
        assert!(matcher.is_complete());
    }

    #[test]
    fn mismatch_resets() {
        let mut matcher = TerminatorMatcher::header_end();
        assert_eq!(matcher.scan(b"\r\nX\r\n"), None);
        assert_eq!(matcher.matched(), 2);
        matcher.reset();
        assert_eq!(matcher.matched(), 0);
    }
}
