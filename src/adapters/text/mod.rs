//! Text extraction adapters.
//!
//! Implementations of the TextExtractor port.

mod plain_text_extractor;

pub use plain_text_extractor::{combine_documents, PlainTextExtractor};
