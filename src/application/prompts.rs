//! Prompt contracts for the two generation stages.
//!
//! The system prompts pin the exact JSON shape the validator expects, and
//! the sampling constants reproduce the wire-level contract: near-zero
//! temperature and stop sequences that cut off trailing prose before the
//! model can emit it.

use std::fmt;
use std::str::FromStr;

/// Sampling temperature. Very low for consistent JSON output.
pub const TEMPERATURE: f32 = 0.1;
/// Completion token budget.
pub const MAX_TOKENS: u32 = 4000;
/// Nucleus sampling cutoff.
pub const TOP_P: f32 = 0.9;
/// Penalty for repeated tokens.
pub const FREQUENCY_PENALTY: f32 = 0.0;
/// Penalty for already-present tokens.
pub const PRESENCE_PENALTY: f32 = 0.0;

/// Stop sequences that prevent the model from appending commentary or
/// opening a markdown fence after the JSON payload.
pub const STOP_SEQUENCES: [&str; 5] = [
    "\n\nHuman:",
    "\n\nAssistant:",
    "```",
    "Note:",
    "Explanation:",
];

/// System prompt for the summarization stage.
pub const SUMMARY_SYSTEM_PROMPT: &str = r#"You are an expert Business Analyst. You MUST respond with ONLY a valid JSON object in the EXACT format specified below. No additional text, explanations, or markdown formatting.

CRITICAL INSTRUCTIONS:
- Respond with ONLY the JSON object
- Do NOT use markdown code blocks (no ```json)
- Do NOT add any explanatory text before or after the JSON
- Extract actual information from the document when available
- Use generic fallbacks only when specific information is not found
- All string values must be properly escaped for JSON

REQUIRED JSON FORMAT (copy this structure exactly):
{
  "projectOverview": {
    "title": "Extract actual project name or use 'Business Requirements Analysis'",
    "description": "Extract actual project description or use generic description",
    "scope": "Extract actual scope or use generic scope",
    "objectives": ["Extract actual objectives as array of strings, minimum 3 items"]
  },
  "stakeholders": [
    {
      "name": "Extract actual names or use generic roles",
      "role": "Extract actual roles",
      "responsibilities": ["Array of responsibility strings"]
    }
  ],
  "functionalRequirements": [
    {
      "id": "REQ-001",
      "title": "Extract or generate requirement title",
      "description": "Extract actual requirement description",
      "priority": "High",
      "acceptanceCriteria": ["Array of criteria strings"]
    }
  ],
  "nonFunctionalRequirements": [
    {
      "category": "Performance",
      "requirements": ["Array of NFR strings"]
    }
  ],
  "userStories": [
    {
      "id": "US-001",
      "asA": "User type",
      "iWant": "User want",
      "soThat": "User benefit",
      "acceptanceCriteria": ["Array of criteria"],
      "priority": "High"
    }
  ],
  "businessRules": ["Array of business rule strings"],
  "constraints": ["Array of constraint strings"],
  "assumptions": ["Array of assumption strings"],
  "dependencies": ["Array of dependency strings"]
}

VALIDATION RULES:
- All arrays must have at least 1 item
- Priority values must be exactly: "Critical", "High", "Medium", or "Low"
- All strings must be non-empty
- Functional requirements must have sequential REQ-XXX IDs
- User stories must have sequential US-XXX IDs"#;

/// System prompt for the test-case generation stage.
pub const TEST_CASE_SYSTEM_PROMPT: &str = r#"You are an expert QA Engineer. You MUST respond with ONLY a valid JSON array in the EXACT format specified below. No additional text, explanations, or markdown formatting.

CRITICAL INSTRUCTIONS:
- Respond with ONLY the JSON array
- Do NOT use markdown code blocks (no ```json)
- Do NOT add any explanatory text before or after the JSON
- Generate comprehensive test cases based on the requirements provided
- Include both positive and negative test scenarios
- Create detailed step-by-step test procedures

REQUIRED JSON FORMAT (copy this structure exactly):
[
  {
    "id": "TC-001",
    "title": "Descriptive test case title",
    "description": "Detailed description of what is being tested",
    "category": "Feature category from requirements",
    "priority": "High",
    "type": "Functional",
    "preconditions": ["Array of precondition strings"],
    "steps": [
      {
        "stepNumber": 1,
        "action": "Specific action to perform",
        "expectedResult": "Expected outcome of this step"
      }
    ],
    "expectedOutcome": "Overall expected result of the test",
    "testData": ["Array of test data strings"],
    "status": "Not Started",
    "estimatedTime": "30 minutes",
    "relatedRequirement": "REQ-001"
  }
]

VALIDATION RULES:
- Generate minimum 5 test cases, maximum 20
- Test case IDs must be sequential: TC-001, TC-002, etc.
- Priority must be exactly: "Critical", "High", "Medium", or "Low"
- Type must be exactly: "Functional", "Non-Functional", "Integration", "UI/UX", "Security", or "Performance"
- Status must be exactly: "Not Started"
- Each test case must have at least 3 steps
- Steps must be numbered sequentially starting from 1
- All arrays must have at least 1 item
- All strings must be non-empty and descriptive"#;

/// Builds the user message for the summarization stage.
pub fn summary_user_message(document: &str) -> String {
    format!(
        "Analyze this business requirements document and extract structured information. \
         Respond with ONLY the JSON object in the exact format specified:\n\n\
         DOCUMENT:\n{document}\n\n\
         Remember: Respond with ONLY the JSON object, no markdown, no explanations."
    )
}

/// Builds the user message for the test-case generation stage, optionally
/// appending a focus directive.
pub fn test_case_user_message(requirements: &str, focus: Option<FocusArea>) -> String {
    let mut message = format!(
        "Generate comprehensive test cases based on these requirements. \
         Respond with ONLY the JSON array in the exact format specified:\n\n\
         REQUIREMENTS:\n{requirements}\n\n\
         Remember: Respond with ONLY the JSON array, no markdown, no explanations."
    );
    if let Some(focus) = focus {
        message.push_str("\n\nFOCUS:\n");
        message.push_str(focus.directive());
    }
    message
}

/// Emphasis directive for test-case generation. Alters which scenarios
/// the model weights, never the output schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusArea {
    Security,
    Performance,
    Mobile,
    Usability,
    Regression,
}

impl FocusArea {
    /// All supported focus areas.
    pub const ALL: [FocusArea; 5] = [
        FocusArea::Security,
        FocusArea::Performance,
        FocusArea::Mobile,
        FocusArea::Usability,
        FocusArea::Regression,
    ];

    /// The directive text appended to the user message.
    pub fn directive(&self) -> &'static str {
        match self {
            FocusArea::Security => {
                "Emphasize security test scenarios: authentication, authorization, \
                 input validation, injection attempts, and data protection. \
                 Set type to \"Security\" where appropriate."
            }
            FocusArea::Performance => {
                "Emphasize performance test scenarios: response times, load handling, \
                 concurrent usage, and resource limits. \
                 Set type to \"Performance\" where appropriate."
            }
            FocusArea::Mobile => {
                "Emphasize mobile test scenarios: small-screen layouts, touch \
                 interactions, intermittent connectivity, and device constraints."
            }
            FocusArea::Usability => {
                "Emphasize usability test scenarios: navigation flows, error messages, \
                 accessibility, and first-time-user experience. \
                 Set type to \"UI/UX\" where appropriate."
            }
            FocusArea::Regression => {
                "Emphasize regression coverage: existing core workflows that must keep \
                 working, boundary values, and previously error-prone paths."
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FocusArea::Security => "security",
            FocusArea::Performance => "performance",
            FocusArea::Mobile => "mobile",
            FocusArea::Usability => "usability",
            FocusArea::Regression => "regression",
        }
    }
}

impl fmt::Display for FocusArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FocusArea {
    type Err = UnknownFocusArea;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FocusArea::ALL
            .iter()
            .copied()
            .find(|area| area.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownFocusArea(s.to_string()))
    }
}

/// Error for an unrecognized focus area name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown focus area `{0}`")]
pub struct UnknownFocusArea(pub String);
