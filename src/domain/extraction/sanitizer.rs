//! Response sanitizer for LLM chat-completion output.
//!
//! Model replies rarely arrive as bare JSON. They come wrapped in markdown
//! fences, prefixed with conversational preambles, or followed by trailing
//! prose. `sanitize` strips all of that and returns exactly one balanced
//! JSON value of the requested kind, or a typed error naming what was
//! missing.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Which JSON value kind the caller expects at the top level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Object,
    Array,
}

impl JsonKind {
    fn open(&self) -> char {
        match self {
            JsonKind::Object => '{',
            JsonKind::Array => '[',
        }
    }

    fn close(&self) -> char {
        match self {
            JsonKind::Object => '}',
            JsonKind::Array => ']',
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonKind::Object => write!(f, "object"),
            JsonKind::Array => write!(f, "array"),
        }
    }
}

/// Failure to isolate a JSON value from a model reply.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("no JSON {0} found in response")]
    NoJson(JsonKind),
    #[error("JSON {0} is not balanced")]
    Unbalanced(JsonKind),
}

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```[a-zA-Z]*\s*").unwrap_or_else(|e| panic!("invalid fence regex: {e}"))
});

/// Conversational lead-ins models commonly emit before the payload.
/// Compared case-insensitively against the start of each line that
/// precedes the first bracket.
const KNOWN_PREAMBLES: &[&str] = &[
    "Here is the JSON object:",
    "Here is the JSON:",
    "Here's the JSON:",
    "The JSON structure is:",
    "Based on the analysis:",
    "Here is the analysis:",
    "The extracted information:",
    "Analysis result:",
];

/// Strips markdown fences and known preambles from `raw`, then returns
/// the first balanced JSON value of the requested `kind`.
///
/// Brackets inside string literals do not affect balance, and escaped
/// quotes do not terminate strings. Anything after the balanced value,
/// including stray brackets in trailing prose, is discarded.
pub fn sanitize(raw: &str, kind: JsonKind) -> Result<String, ExtractionError> {
    let without_fences = CODE_FENCE.replace_all(raw, "");
    let stripped = strip_preambles(&without_fences, kind);

    let start = stripped.find(kind.open()).ok_or(ExtractionError::NoJson(kind))?;
    let candidate = &stripped[start..];
    let end = balanced_end(candidate, kind).ok_or(ExtractionError::Unbalanced(kind))?;

    Ok(candidate[..=end].to_string())
}

/// Removes known preamble phrases from lines that appear before the
/// first opening bracket. Lines past that point are payload and must
/// not be touched.
fn strip_preambles(text: &str, kind: JsonKind) -> String {
    let first_open = text.find(kind.open()).unwrap_or(text.len());
    let mut out = String::with_capacity(text.len());
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        if line_start >= first_open {
            out.push_str(line);
            continue;
        }
        out.push_str(strip_preamble_from_line(line));
    }
    out
}

fn strip_preamble_from_line(line: &str) -> &str {
    let trimmed = line.trim_start();
    let lead = line.len() - trimmed.len();
    for preamble in KNOWN_PREAMBLES {
        if trimmed.len() >= preamble.len()
            && trimmed.is_char_boundary(preamble.len())
            && trimmed[..preamble.len()].eq_ignore_ascii_case(preamble)
        {
            return &line[lead + preamble.len()..];
        }
    }
    line
}

/// Returns the byte index of the closing bracket that balances the
/// opening bracket at position 0, tracking string literals so brackets
/// inside them are ignored.
fn balanced_end(text: &str, kind: JsonKind) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == kind.open() && !in_string => depth += 1,
            c if c == kind.close() && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
