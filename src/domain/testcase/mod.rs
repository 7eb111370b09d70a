//! Test case types produced by the generation pipeline.
//!
//! A `TestCase` is a flat, executable artifact: ordered steps with
//! expected results plus the metadata a tester needs to run it. The
//! JSON contract uses camelCase keys and a handful of display-style
//! enum strings ("Non-Functional", "UI/UX", "Not Started").

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::summary::Priority;

/// An executable test case derived from requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// Sequential `TC-NNN` id, unique within a generated batch.
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(rename = "type")]
    pub case_type: TestCaseType,
    pub category: String,
    pub preconditions: Vec<String>,
    /// Ordered, numbered 1..=N after normalization.
    pub steps: Vec<TestStep>,
    pub expected_outcome: String,
    pub test_data: Vec<String>,
    /// Free-form estimate such as "30 minutes".
    pub estimated_time: String,
    /// Always `Not Started` on freshly generated cases.
    pub status: TestCaseStatus,
    /// `REQ-NNN` / `US-NNN` reference, or empty when untraceable.
    pub related_requirement: String,
}

/// A single action within a test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStep {
    pub step_number: u32,
    pub action: String,
    pub expected_result: String,
}

/// Kind of coverage a test case provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TestCaseType {
    #[default]
    Functional,
    #[serde(rename = "Non-Functional")]
    NonFunctional,
    Integration,
    #[serde(rename = "UI/UX")]
    UiUx,
    Security,
    Performance,
}

impl TestCaseType {
    /// Coerces a free-form string into a type, defaulting to `Functional`
    /// for anything unrecognized.
    pub fn coerce(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("functional") => TestCaseType::Functional,
            Some(v) if v.eq_ignore_ascii_case("non-functional") => TestCaseType::NonFunctional,
            Some(v) if v.eq_ignore_ascii_case("integration") => TestCaseType::Integration,
            Some(v) if v.eq_ignore_ascii_case("ui/ux") => TestCaseType::UiUx,
            Some(v) if v.eq_ignore_ascii_case("security") => TestCaseType::Security,
            Some(v) if v.eq_ignore_ascii_case("performance") => TestCaseType::Performance,
            _ => TestCaseType::Functional,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TestCaseType::Functional => "Functional",
            TestCaseType::NonFunctional => "Non-Functional",
            TestCaseType::Integration => "Integration",
            TestCaseType::UiUx => "UI/UX",
            TestCaseType::Security => "Security",
            TestCaseType::Performance => "Performance",
        }
    }
}

impl fmt::Display for TestCaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Execution status of a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TestCaseStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Passed,
    Failed,
    Blocked,
}
