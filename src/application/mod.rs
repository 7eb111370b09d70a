//! Application layer - commands and handlers.
//!
//! This layer orchestrates domain operations and coordinates between
//! ports. Each generation stage is a command with a handler that owns
//! the prompt construction and the sanitize/parse/validate pipeline.

pub mod generate_test_cases;
pub mod prompts;
pub mod summarize;

pub use generate_test_cases::{
    GenerateTestCasesCommand, GenerateTestCasesError, GenerateTestCasesHandler, TestCaseSource,
};
pub use prompts::{FocusArea, UnknownFocusArea};
pub use summarize::{SummarizeCommand, SummarizeError, SummarizeHandler, MIN_DOCUMENT_LENGTH};
