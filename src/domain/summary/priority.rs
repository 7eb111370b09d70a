use std::fmt;

use serde::{Deserialize, Serialize};

/// Priority level for requirements and user stories.
///
/// Serializes as the capitalized English word ("Critical", "High", ...)
/// to match the JSON contract used by the prompt templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Coerces a free-form string into a priority, defaulting to `Medium`
    /// for anything unrecognized. Matching is case-insensitive.
    pub fn coerce(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("critical") => Priority::Critical,
            Some(v) if v.eq_ignore_ascii_case("high") => Priority::High,
            Some(v) if v.eq_ignore_ascii_case("medium") => Priority::Medium,
            Some(v) if v.eq_ignore_ascii_case("low") => Priority::Low,
            _ => Priority::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_is_case_insensitive() {
        assert_eq!(Priority::coerce(Some("CRITICAL")), Priority::Critical);
        assert_eq!(Priority::coerce(Some("high")), Priority::High);
        assert_eq!(Priority::coerce(Some("Low")), Priority::Low);
    }

    #[test]
    fn coerce_defaults_to_medium() {
        assert_eq!(Priority::coerce(None), Priority::Medium);
        assert_eq!(Priority::coerce(Some("urgent")), Priority::Medium);
        assert_eq!(Priority::coerce(Some("")), Priority::Medium);
    }

    #[test]
    fn serializes_as_capitalized_word() {
        let json = serde_json::to_string(&Priority::Critical).unwrap();
        assert_eq!(json, "\"Critical\"");
        let back: Priority = serde_json::from_str("\"Medium\"").unwrap();
        assert_eq!(back, Priority::Medium);
    }
}
