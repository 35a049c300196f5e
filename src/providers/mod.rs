//! Remote completion provider implementations.

pub mod openai;

pub use openai::{OpenAiClient, OpenAiConfig, ProviderError, ProviderErrorKind};
