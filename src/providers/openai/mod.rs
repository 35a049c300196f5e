//! OpenAI-compatible chat-completion client.
//!
//! One non-streaming request per turn: the persona instruction followed by
//! the full conversation history, first choice's text back.

mod auth;
mod client;
mod errors;
mod types;

pub use auth::{DEFAULT_BASE_URL, OpenAiConfig};
pub use client::OpenAiClient;
pub use errors::{ProviderError, ProviderErrorKind};
