//! Turning raw model replies into validated domain values.
//!
//! Three stages: `sanitizer` isolates a JSON value from a noisy reply,
//! `validator` repairs and normalizes the parsed value, and `rules` is
//! the deterministic fallback that works from the document text alone.

pub mod rules;
pub mod sanitizer;
pub mod validator;

pub use rules::{binary_file_summary, extract_summary, BINARY_CONTENT_SENTINEL};
pub use sanitizer::{sanitize, ExtractionError, JsonKind};
pub use validator::{validate_summary, validate_test_cases, SchemaError};
