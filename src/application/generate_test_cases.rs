//! GenerateTestCasesHandler - command handler for test-case generation.
//!
//! Unlike summarization, a reply that cannot be turned into test cases is
//! a hard error. The caller asked for executable artifacts; a silently
//! substituted generic set would be worse than a visible failure. The
//! error variants distinguish "no array at all", "array found but
//! malformed" and "array parsed but empty" so callers can report each.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::application::prompts::{self, FocusArea, TEST_CASE_SYSTEM_PROMPT};
use crate::domain::extraction::{
    sanitize, validate_test_cases, ExtractionError, JsonKind, SchemaError,
};
use crate::domain::summary::Summary;
use crate::domain::testcase::TestCase;
use crate::ports::{AiError, AiProvider, CompletionRequest, MessageRole};

/// What the test cases are generated from.
#[derive(Debug, Clone)]
pub enum TestCaseSource {
    /// A validated summary, serialized into the prompt.
    Summary(Summary),
    /// Raw prior text (e.g. the original document).
    RawText(String),
}

/// Command to generate test cases.
#[derive(Debug, Clone)]
pub struct GenerateTestCasesCommand {
    pub source: TestCaseSource,
    pub focus: Option<FocusArea>,
}

/// Handler for test-case generation.
pub struct GenerateTestCasesHandler {
    provider: Arc<dyn AiProvider>,
}

/// Test-case generation errors.
#[derive(Debug, Error)]
pub enum GenerateTestCasesError {
    /// The provider call itself failed.
    #[error(transparent)]
    Provider(#[from] AiError),

    /// The reply contained no JSON array at all.
    #[error("model reply contained no JSON array")]
    NoArrayFound,

    /// An array was found but could not be parsed or validated.
    #[error("model reply contained a malformed test case array: {0}")]
    MalformedArray(String),

    /// The array parsed but yielded zero usable test cases.
    #[error("model reply contained zero usable test cases")]
    NoTestCases,

    /// The summary could not be serialized into the prompt.
    #[error("failed to serialize summary: {0}")]
    SerializeSummary(#[from] serde_json::Error),
}

impl GenerateTestCasesHandler {
    pub fn new(provider: Arc<dyn AiProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(
        &self,
        cmd: GenerateTestCasesCommand,
    ) -> Result<Vec<TestCase>, GenerateTestCasesError> {
        let requirements = match &cmd.source {
            TestCaseSource::Summary(summary) => serde_json::to_string_pretty(summary)?,
            TestCaseSource::RawText(text) => text.clone(),
        };

        let request = CompletionRequest::new()
            .with_system_prompt(TEST_CASE_SYSTEM_PROMPT)
            .with_message(
                MessageRole::User,
                prompts::test_case_user_message(&requirements, cmd.focus),
            )
            .with_temperature(prompts::TEMPERATURE)
            .with_max_tokens(prompts::MAX_TOKENS)
            .with_top_p(prompts::TOP_P)
            .with_frequency_penalty(prompts::FREQUENCY_PENALTY)
            .with_presence_penalty(prompts::PRESENCE_PENALTY)
            .with_stop(prompts::STOP_SEQUENCES);

        let response = self.provider.complete(request).await?;
        debug!(
            model = %response.model,
            completion_tokens = response.usage.completion_tokens,
            "received test case completion"
        );

        parse_test_cases(&response.content)
    }
}

/// Runs the sanitize, parse, validate pipeline on a model reply.
fn parse_test_cases(reply: &str) -> Result<Vec<TestCase>, GenerateTestCasesError> {
    let json_text = sanitize(reply, JsonKind::Array).map_err(|e| match e {
        ExtractionError::NoJson(_) => GenerateTestCasesError::NoArrayFound,
        ExtractionError::Unbalanced(_) => GenerateTestCasesError::MalformedArray(e.to_string()),
    })?;

    let value: serde_json::Value = serde_json::from_str(&json_text)
        .map_err(|e| GenerateTestCasesError::MalformedArray(e.to_string()))?;

    validate_test_cases(value).map_err(|e| match e {
        SchemaError::NoTestCases => GenerateTestCasesError::NoTestCases,
        other => GenerateTestCasesError::MalformedArray(other.to_string()),
    })
}
