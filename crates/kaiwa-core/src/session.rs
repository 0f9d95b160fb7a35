//! Session controller: owns the transcript and mediates completion calls.
//!
//! The controller is the only component allowed to mutate session state.
//! It accepts user submissions while idle, rejects them while a request
//! is outstanding, and converts completion failures into a normal
//! transcript turn so the session never gets stuck.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::completion::CompletionBackend;
use crate::transcript::{SessionState, Turn};

/// Reply appended when a completion request fails.
///
/// Fixed text, never derived from the failure detail: all failures
/// render identically to the user.
pub const ERROR_REPLY: &str = "エラーが発生しました。もう一度試してください。";

/// Result of a [`SessionController::submit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The request settled and a reply (or the error reply) was appended.
    Replied,
    /// The input trimmed to nothing; no state change.
    IgnoredEmpty,
    /// A request was already outstanding; no state change.
    IgnoredBusy,
}

/// Long-lived controller for a single conversation session.
///
/// Holds the [`SessionState`] behind a lock; all methods take `&self` so
/// the controller can be shared across tasks. The backend call is the
/// sole suspension point, and the lock is never held across it.
pub struct SessionController {
    state: RwLock<SessionState>,
    backend: Arc<dyn CompletionBackend>,
}

impl SessionController {
    /// Creates a controller with an empty transcript.
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            state: RwLock::new(SessionState::default()),
            backend,
        }
    }

    /// Submits user text and awaits the reply.
    ///
    /// Whitespace-only input and input arriving while a request is
    /// outstanding are ignored without touching the transcript. An
    /// accepted submit appends the user turn immediately, issues exactly
    /// one backend call, then appends exactly one assistant turn once
    /// the call settles; failures become the fixed [`ERROR_REPLY`] and
    /// the session keeps accepting input.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        if text.trim().is_empty() {
            return SubmitOutcome::IgnoredEmpty;
        }

        let turns = {
            let mut state = self.state.write().await;
            if state.busy {
                return SubmitOutcome::IgnoredBusy;
            }
            state.busy = true;
            state.transcript.append(Turn::user(text));
            state.transcript.turns().to_vec()
        };

        tracing::debug!(context_turns = turns.len(), "issuing completion request");
        let result = self.backend.complete(&turns).await;

        // The lock was released across the await. A clear() issued in the
        // meantime has already taken effect, and this late resolution
        // appends to whatever transcript exists now.
        let mut state = self.state.write().await;
        match result {
            Ok(reply) => {
                tracing::debug!(chars = reply.len(), "completion request settled");
                state.transcript.append(Turn::assistant(reply));
            }
            Err(err) => {
                tracing::warn!(kind = ?err.kind(), "completion request failed");
                state.transcript.append(Turn::assistant(ERROR_REPLY));
            }
        }
        state.busy = false;

        SubmitOutcome::Replied
    }

    /// Discards the whole transcript atomically.
    ///
    /// Allowed in any state. Does not cancel an in-flight request and
    /// does not touch the busy flag: a request issued before the clear
    /// still resolves and appends its turn to the emptied transcript.
    pub async fn clear(&self) {
        self.state.write().await.transcript.clear();
    }

    /// Cloned view of the current state for rendering.
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Whether a completion request is currently outstanding.
    pub async fn is_busy(&self) -> bool {
        self.state.read().await.busy
    }
}
