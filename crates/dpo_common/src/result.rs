//! Common result and error types for the dpo crates.

/// The standard result type for fallible internal operations.
///
/// `Err` indicates an unrecoverable internal error (a bug in dpo), not a
/// problem with the input design. Design problems are reported through
/// [`DiagnosticSink`](dpo_diagnostics) and the operation still returns `Ok`.
pub type DpoResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug in dpo, not a user input problem.
#[derive(Debug, thiserror::Error)]
#[error("internal placer error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let err = InternalError::new("segment list out of sync");
        assert_eq!(
            format!("{err}"),
            "internal placer error: segment list out of sync"
        );
    }

    #[test]
    fn err_path() {
        let r: DpoResult<i32> = Err(InternalError::new("bad stamp"));
        let err = r.err().unwrap();
        assert_eq!(err.message, "bad stamp");
    }

    #[test]
    fn from_string() {
        let err: InternalError = "from string".to_string().into();
        assert_eq!(err.message, "from string");
    }
}
