//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `summary` - Structured summary of a business-requirements document
//! - `testcase` - Executable test cases derived from a summary
//! - `extraction` - The extraction pipeline: response sanitizer, schema
//!   validator/normalizer, and the deterministic rule-based extractor

pub mod extraction;
pub mod summary;
pub mod testcase;
