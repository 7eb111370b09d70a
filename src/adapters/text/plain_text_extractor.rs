//! Plain text extractor - decodes uploaded bytes into analyzable text.
//!
//! Content that is recognizably binary (PDF magic bytes, zip containers,
//! a high ratio of control characters) is not an error: it becomes a
//! binary-content notice carrying the file name, which downstream turns
//! into a template summary instead of a network call.

use crate::domain::extraction::BINARY_CONTENT_SENTINEL;
use crate::ports::{TextExtractionError, TextExtractor};

/// Fraction of control characters above which content is treated as binary.
const BINARY_CONTROL_CHAR_RATIO: f64 = 0.05;

/// Extractor for plain-text formats (txt, md, csv). Also the catch-all
/// for anything else uploaded; undecodable formats degrade to a notice.
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, file_name: &str, bytes: &[u8]) -> Result<String, TextExtractionError> {
        if bytes.is_empty() {
            return Err(TextExtractionError::Empty {
                file_name: file_name.to_string(),
            });
        }

        let content = String::from_utf8_lossy(bytes);
        if is_probably_binary(&content) {
            return Ok(binary_notice(file_name, bytes.len()));
        }

        Ok(clean_and_normalize(&content))
    }
}

/// Heuristic binary detection on decoded content.
fn is_probably_binary(content: &str) -> bool {
    if content.starts_with("%PDF-") {
        return true;
    }
    // Zip containers (docx, xlsx), leading NUL, or replacement chars from
    // lossy decoding
    if content.starts_with("PK") || content.starts_with('\u{0}') || content.contains('\u{FFFD}') {
        return true;
    }

    let total = content.chars().count();
    if total == 0 {
        return false;
    }
    let control = content
        .chars()
        .filter(|c| (*c as u32) < 32 && !matches!(c, '\t' | '\n' | '\r'))
        .count();

    (control as f64 / total as f64) > BINARY_CONTROL_CHAR_RATIO
}

/// Builds the notice text produced for binary content. The sentinel line
/// and the `File:` line are load-bearing: the former routes the document
/// to the template summary, the latter carries the file name into it.
fn binary_notice(file_name: &str, size_bytes: usize) -> String {
    format!(
        "{BINARY_CONTENT_SENTINEL}\n\n\
         This appears to be a binary file (likely a PDF or Office document).\n\
         For best results, please:\n\
         1. Convert your document to plain text (.txt) format, or\n\
         2. Copy and paste the content directly into a text document\n\n\
         File: {file_name}\n\
         Size: {size_bytes} bytes"
    )
}

/// Strips dangerous control characters, normalizes line endings and
/// collapses excessive whitespace, while keeping intentional formatting.
fn clean_and_normalize(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    let mut pending_space_run = 0usize;
    let mut newline_run = 0usize;

    for ch in text.replace("\r\n", "\n").replace('\r', "\n").chars() {
        match ch {
            c if (c as u32) < 32 && !matches!(c, '\t' | '\n') => continue,
            ' ' | '\t' => {
                pending_space_run += 1;
                continue;
            }
            '\n' => {
                pending_space_run = 0;
                newline_run += 1;
                // At most 3 consecutive line breaks
                if newline_run <= 3 {
                    cleaned.push('\n');
                }
                continue;
            }
            _ => {}
        }
        if pending_space_run > 0 {
            // 4+ spaces or tabs collapse to 3 spaces
            let spaces = pending_space_run.min(3);
            for _ in 0..spaces {
                cleaned.push(' ');
            }
            pending_space_run = 0;
        }
        newline_run = 0;
        cleaned.push(ch);
    }

    let cleaned = cleaned.trim().to_string();
    if cleaned.chars().count() < 10 {
        return "Document content could not be processed properly.".to_string();
    }
    cleaned
}

/// Combines multiple extracted documents into one analysis input, with
/// separators marking each document's boundaries. A single document
/// passes through unchanged.
pub fn combine_documents(documents: &[(String, String)]) -> String {
    match documents {
        [] => String::new(),
        [(_, content)] => content.clone(),
        many => many
            .iter()
            .enumerate()
            .map(|(index, (name, content))| {
                format!(
                    "\n\n=== DOCUMENT {}: {} ===\n{}\n=== END OF {} ===\n",
                    index + 1,
                    name,
                    content,
                    name
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}
