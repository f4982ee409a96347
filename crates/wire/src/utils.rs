//! Utility macros shared by the codec and connection modules.

/// Returns early with `$error` when `$predicate` does not hold.
///
/// Works like `assert!`, but hands the error back to the caller instead of
/// panicking.
///
/// ```ignore
/// ensure!(body_offset <= MAX_HEADER_BYTES, ParseError::too_large_header(body_offset, MAX_HEADER_BYTES));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
