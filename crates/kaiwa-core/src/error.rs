//! Error types for the Kaiwa session core.

use thiserror::Error;

/// Internal classification of a completion failure.
///
/// Exposed for tracing only. Callers must not branch on it: every kind
/// renders identically to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionErrorKind {
    /// The request never produced an HTTP response.
    Transport,
    /// The service answered with a non-success status.
    Status(u16),
    /// The response body could not be interpreted as a reply.
    Malformed,
}

/// A failed completion request.
///
/// Deliberately opaque: transport failures, API errors, and parse errors
/// all collapse into this one value with a uniform message, so callers
/// get uniform handling. The finer [`CompletionErrorKind`] exists for
/// log output only.
#[derive(Error, Debug, Clone)]
#[error("completion request failed")]
pub struct CompletionError {
    kind: CompletionErrorKind,
}

impl CompletionError {
    /// Creates a transport-level failure.
    pub fn transport() -> Self {
        Self {
            kind: CompletionErrorKind::Transport,
        }
    }

    /// Creates a failure for a non-success HTTP status.
    pub fn status(code: u16) -> Self {
        Self {
            kind: CompletionErrorKind::Status(code),
        }
    }

    /// Creates a failure for an unusable response body.
    pub fn malformed() -> Self {
        Self {
            kind: CompletionErrorKind::Malformed,
        }
    }

    /// The internal failure classification.
    pub fn kind(&self) -> CompletionErrorKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_uniform_across_kinds() {
        let errors = [
            CompletionError::transport(),
            CompletionError::status(500),
            CompletionError::malformed(),
        ];

        for err in &errors {
            assert_eq!(err.to_string(), "completion request failed");
        }
    }

    #[test]
    fn kind_is_preserved_for_logging() {
        assert_eq!(
            CompletionError::status(429).kind(),
            CompletionErrorKind::Status(429)
        );
    }
}
