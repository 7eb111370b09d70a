//! CaseForge - Requirements-to-Test-Case Generation
//!
//! This crate turns business-requirement documents into structured summaries
//! and then into executable test cases, using an LLM chat-completion endpoint
//! with a deterministic rule-based fallback extractor.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
