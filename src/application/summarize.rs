//! SummarizeHandler - command handler for document summarization.
//!
//! Summarization must always produce a summary for analyzable input.
//! If the model reply cannot be sanitized, parsed or validated, the
//! rule-based extractor takes over instead of surfacing an error. Only
//! a transport failure or an unanalyzable document reaches the caller
//! as an error.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::prompts::{self, SUMMARY_SYSTEM_PROMPT};
use crate::domain::extraction::{rules, sanitize, validate_summary, JsonKind, BINARY_CONTENT_SENTINEL};
use crate::domain::summary::Summary;
use crate::ports::{AiError, AiProvider, CompletionRequest, MessageRole};

/// Minimum characters of document text worth sending for analysis.
pub const MIN_DOCUMENT_LENGTH: usize = 50;

/// Command to summarize a requirements document.
#[derive(Debug, Clone)]
pub struct SummarizeCommand {
    pub document_text: String,
}

/// Handler for document summarization.
pub struct SummarizeHandler {
    provider: Arc<dyn AiProvider>,
}

/// Summarization errors surfaced to the caller.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Input is too short to analyze.
    #[error("document is too short to analyze: {length} characters, need {MIN_DOCUMENT_LENGTH}")]
    DocumentTooShort {
        /// Characters in the trimmed input.
        length: usize,
    },

    /// The provider call itself failed. Retry policy is the caller's.
    #[error(transparent)]
    Provider(#[from] AiError),
}

impl SummarizeHandler {
    pub fn new(provider: Arc<dyn AiProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(&self, cmd: SummarizeCommand) -> Result<Summary, SummarizeError> {
        let document = cmd.document_text.trim();

        if document.contains(BINARY_CONTENT_SENTINEL) {
            info!("binary content detected, producing template summary");
            return Ok(rules::binary_file_summary(document));
        }

        let length = document.chars().count();
        if length < MIN_DOCUMENT_LENGTH {
            return Err(SummarizeError::DocumentTooShort { length });
        }

        let request = CompletionRequest::new()
            .with_system_prompt(SUMMARY_SYSTEM_PROMPT)
            .with_message(MessageRole::User, prompts::summary_user_message(document))
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
            "received summary completion"
        );

        match parse_summary(&response.content, document) {
            Ok(summary) => Ok(summary),
            Err(reason) => {
                warn!(%reason, "model reply unusable, falling back to rule-based extraction");
                Ok(rules::extract_summary(document))
            }
        }
    }
}

/// Runs the sanitize, parse, validate pipeline on a model reply.
fn parse_summary(reply: &str, document: &str) -> Result<Summary, String> {
    let json_text = sanitize(reply, JsonKind::Object).map_err(|e| e.to_string())?;
    let value: serde_json::Value =
        serde_json::from_str(&json_text).map_err(|e| e.to_string())?;
    validate_summary(value, document).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAiProvider, MockError};

    fn long_document() -> String {
        "Project Overview: The billing system shall automate invoice generation \
         and reconciliation for the finance department."
            .to_string()
    }

    fn valid_summary_json() -> String {
        serde_json::json!({
            "projectOverview": {
                "title": "Billing Automation",
                "description": "Automate invoice generation",
                "scope": "Invoicing",
                "objectives": ["Reduce manual work"]
            },
            "functionalRequirements": [
                {"description": "System shall generate invoices", "priority": "High"}
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn valid_reply_becomes_typed_summary() {
        let provider = Arc::new(MockAiProvider::new().with_response(valid_summary_json()));
        let handler = SummarizeHandler::new(provider);

        let summary = handler
            .handle(SummarizeCommand { document_text: long_document() })
            .await
            .unwrap();

        assert_eq!(summary.project_overview.title, "Billing Automation");
        assert_eq!(summary.functional_requirements[0].id, "REQ-001");
    }

    #[tokio::test]
    async fn empty_reply_falls_back_to_rules() {
        let provider = Arc::new(MockAiProvider::new().with_response(""));
        let handler = SummarizeHandler::new(provider);

        let summary = handler
            .handle(SummarizeCommand { document_text: long_document() })
            .await
            .unwrap();

        // Rule-based extraction found the overview section in the document
        assert!(summary.project_overview.description.contains("billing system"));
    }

    #[tokio::test]
    async fn short_document_is_rejected_without_a_call() {
        let provider = Arc::new(MockAiProvider::new());
        let handler = SummarizeHandler::new(provider.clone());

        let err = handler
            .handle(SummarizeCommand { document_text: "too short".to_string() })
            .await
            .unwrap_err();

        assert!(matches!(err, SummarizeError::DocumentTooShort { length: 9 }));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn binary_sentinel_skips_the_provider() {
        let provider = Arc::new(MockAiProvider::new());
        let handler = SummarizeHandler::new(provider.clone());

        let summary = handler
            .handle(SummarizeCommand {
                document_text: format!("{BINARY_CONTENT_SENTINEL}\nFile: spec.pdf"),
            })
            .await
            .unwrap();

        assert_eq!(summary.project_overview.title, "Document Analysis: spec.pdf");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn provider_errors_are_surfaced_not_swallowed() {
        let provider = Arc::new(
            MockAiProvider::new().with_error(MockError::Unavailable {
                message: "down".to_string(),
            }),
        );
        let handler = SummarizeHandler::new(provider);

        let err = handler
            .handle(SummarizeCommand { document_text: long_document() })
            .await
            .unwrap_err();

        assert!(matches!(err, SummarizeError::Provider(AiError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn request_carries_the_wire_contract() {
        let provider = Arc::new(MockAiProvider::new().with_response(valid_summary_json()));
        let handler = SummarizeHandler::new(provider.clone());

        handler
            .handle(SummarizeCommand { document_text: long_document() })
            .await
            .unwrap();

        let calls = provider.get_calls();
        assert_eq!(calls.len(), 1);
        let request = &calls[0];
        assert_eq!(request.temperature, Some(0.1));
        assert_eq!(request.max_tokens, Some(4000));
        assert_eq!(request.top_p, Some(0.9));
        assert!(request.stop.iter().any(|s| s == "```"));
        assert!(request.system_prompt.as_deref().unwrap().contains("Business Analyst"));
    }
}
