//! Adapters - implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - chat-completion providers (Groq, mock)
//! - `text` - document-to-text conversion

pub mod ai;
pub mod text;

pub use ai::{GroqConfig, GroqProvider, MockAiProvider, MockError, MockResponse};
pub use text::{combine_documents, PlainTextExtractor};
