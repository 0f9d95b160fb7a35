pub mod config;
pub mod openai;

pub use config::{ConfigError, SecretConfig};
pub use openai::OpenAiChatClient;
