//! Completion backend abstraction.

use async_trait::async_trait;

use crate::error::CompletionError;
use crate::transcript::Turn;

/// A service that, given the conversation so far, produces one reply.
///
/// Declared here rather than next to the HTTP client so the session
/// controller can be exercised against in-memory mocks without pulling
/// in any network dependency.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Requests a single reply for the given turns.
    ///
    /// Implementations perform exactly one outbound call per invocation
    /// (no retry, no caching) and collapse every failure mode into
    /// [`CompletionError`]. `turns` is expected to be non-empty: it holds
    /// at least the user's latest turn.
    async fn complete(&self, turns: &[Turn]) -> Result<String, CompletionError>;
}
