//! Ports - interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AiProvider` - chat-completion backend used for generation
//! - `TextExtractor` - document bytes to analyzable text

mod ai_provider;
mod text_extractor;

pub use ai_provider::{
    AiError, AiProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, TokenUsage,
};
pub use text_extractor::{TextExtractionError, TextExtractor};
