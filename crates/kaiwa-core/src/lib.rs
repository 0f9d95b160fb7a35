pub mod completion;
pub mod error;
pub mod session;
pub mod transcript;

// Re-export common types
pub use completion::CompletionBackend;
pub use error::{CompletionError, CompletionErrorKind};
pub use session::{SessionController, SubmitOutcome};
pub use transcript::{Role, SessionState, Transcript, Turn};
