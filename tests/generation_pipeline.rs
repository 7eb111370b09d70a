//! Integration tests for the document-to-test-cases pipeline.
//!
//! These tests verify the end-to-end flow:
//! 1. Raw documents are extracted and combined into analyzable text
//! 2. SummarizeHandler turns model replies (or fallback rules) into a Summary
//! 3. GenerateTestCasesHandler turns a Summary into validated test cases
//! 4. Provider failures and malformed replies surface as the right errors
//!
//! Uses the mock provider to test the pipeline without network access.

use std::sync::Arc;

use caseforge::adapters::text::{combine_documents, PlainTextExtractor};
use caseforge::adapters::{MockAiProvider, MockError};
use caseforge::application::{
    FocusArea, GenerateTestCasesCommand, GenerateTestCasesError, GenerateTestCasesHandler,
    SummarizeCommand, SummarizeError, SummarizeHandler, TestCaseSource,
};
use caseforge::domain::extraction::BINARY_CONTENT_SENTINEL;
use caseforge::domain::testcase::TestCaseStatus;
use caseforge::ports::{AiError, TextExtractor};

const DOCUMENT: &str = "\
# Project: Invoice Portal Modernization

## Project Overview
The finance team needs a self-service portal where vendors submit invoices
and track payment status without emailing the accounts payable inbox.

## Requirements
- **REQ-1:** Vendors must be able to upload PDF invoices up to 10 MB
- **REQ-2:** The system must send an email notification when an invoice is approved

## Constraints
- Must integrate with the existing SAP ledger
";

const SUMMARY_REPLY: &str = r#"```json
{
  "projectOverview": {
    "title": "Invoice Portal Modernization",
    "description": "A self-service portal for vendor invoice submission and payment tracking.",
    "scope": "Vendor-facing invoice workflows",
    "objectives": ["Reduce accounts payable email volume"]
  },
  "stakeholders": [
    {"name": "Finance Team", "role": "Business Owner", "responsibilities": ["Approve invoices"]}
  ],
  "functionalRequirements": [
    {
      "id": "REQ-001",
      "title": "Invoice upload",
      "description": "Vendors must be able to upload PDF invoices up to 10 MB",
      "priority": "High",
      "acceptanceCriteria": ["Verify that a 10 MB PDF uploads successfully"]
    }
  ],
  "nonFunctionalRequirements": [],
  "userStories": [],
  "businessRules": [],
  "constraints": ["Must integrate with the existing SAP ledger"],
  "assumptions": [],
  "dependencies": []
}
```"#;

const TEST_CASE_REPLY: &str = r#"Here are the test cases:
[
  {
    "id": "TC-999",
    "title": "Upload a valid invoice",
    "description": "Verify a vendor can upload a PDF invoice",
    "priority": "High",
    "type": "Functional",
    "category": "Invoicing",
    "preconditions": ["Vendor account exists"],
    "steps": [
      {"stepNumber": 5, "action": "Log in as a vendor", "expectedResult": "Dashboard is shown"},
      {"stepNumber": 9, "action": "Upload invoice.pdf", "expectedResult": "Upload succeeds"}
    ],
    "expectedOutcome": "Invoice appears in the pending queue",
    "testData": ["invoice.pdf, 2 MB"],
    "estimatedTime": "10 minutes",
    "relatedRequirement": "REQ-001"
  }
]"#;

// =============================================================================
// Summarization
// =============================================================================

#[tokio::test]
async fn fenced_model_reply_becomes_typed_summary() {
    let provider = Arc::new(MockAiProvider::new().with_response(SUMMARY_REPLY));
    let handler = SummarizeHandler::new(provider.clone());

    let summary = handler
        .handle(SummarizeCommand {
            document_text: DOCUMENT.to_string(),
        })
        .await
        .unwrap();

    assert_eq!(summary.project_overview.title, "Invoice Portal Modernization");
    assert_eq!(summary.functional_requirements.len(), 1);
    assert_eq!(summary.functional_requirements[0].id, "REQ-001");
    // Validation backfills the sections the model left empty.
    assert!(!summary.user_stories.is_empty());
    assert!(!summary.non_functional_requirements.is_empty());
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn unusable_reply_falls_back_to_rule_extraction() {
    let provider =
        Arc::new(MockAiProvider::new().with_response("I cannot produce JSON for this document."));
    let handler = SummarizeHandler::new(provider);

    let summary = handler
        .handle(SummarizeCommand {
            document_text: DOCUMENT.to_string(),
        })
        .await
        .unwrap();

    // The rule extractor reads the document itself, not the reply.
    assert_eq!(summary.project_overview.title, "Invoice Portal Modernization");
    assert!(summary
        .functional_requirements
        .iter()
        .any(|r| r.description.contains("upload PDF invoices")));
    assert!(summary
        .constraints
        .iter()
        .any(|c| c.contains("SAP ledger")));
}

#[tokio::test]
async fn binary_sentinel_short_circuits_without_provider_call() {
    let provider = Arc::new(MockAiProvider::new());
    let handler = SummarizeHandler::new(provider.clone());

    let text = format!(
        "{BINARY_CONTENT_SENTINEL}\n\nThis file appears to be in a binary format.\n\nFile: quarterly-report.pdf\nSize: 52341 bytes"
    );
    let summary = handler
        .handle(SummarizeCommand { document_text: text })
        .await
        .unwrap();

    assert!(summary
        .project_overview
        .title
        .contains("quarterly-report.pdf"));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn provider_failure_surfaces_instead_of_falling_back() {
    let provider =
        Arc::new(MockAiProvider::new().with_error(MockError::RateLimited { retry_after_secs: 30 }));
    let handler = SummarizeHandler::new(provider);

    let err = handler
        .handle(SummarizeCommand {
            document_text: DOCUMENT.to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SummarizeError::Provider(AiError::RateLimited { .. })
    ));
}

// =============================================================================
// Test-case generation
// =============================================================================

#[tokio::test]
async fn prose_wrapped_array_becomes_validated_test_cases() {
    let provider = Arc::new(MockAiProvider::new().with_response(TEST_CASE_REPLY));
    let handler = GenerateTestCasesHandler::new(provider);

    let cases = handler
        .handle(GenerateTestCasesCommand {
            source: TestCaseSource::RawText(DOCUMENT.to_string()),
            focus: None,
        })
        .await
        .unwrap();

    assert_eq!(cases.len(), 1);
    let case = &cases[0];
    // Ids are resequenced and steps renumbered regardless of what the model sent.
    assert_eq!(case.id, "TC-001");
    assert_eq!(case.steps[0].step_number, 1);
    assert_eq!(case.steps[1].step_number, 2);
    assert_eq!(case.status, TestCaseStatus::NotStarted);
    assert_eq!(case.related_requirement, "REQ-001");
}

#[tokio::test]
async fn reply_without_array_is_no_array_found() {
    let provider =
        Arc::new(MockAiProvider::new().with_response("No test cases could be generated."));
    let handler = GenerateTestCasesHandler::new(provider);

    let err = handler
        .handle(GenerateTestCasesCommand {
            source: TestCaseSource::RawText(DOCUMENT.to_string()),
            focus: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, GenerateTestCasesError::NoArrayFound));
}

#[tokio::test]
async fn truncated_array_is_malformed() {
    let provider = Arc::new(
        MockAiProvider::new().with_response(r#"[{"title": "Cut off mid-"#),
    );
    let handler = GenerateTestCasesHandler::new(provider);

    let err = handler
        .handle(GenerateTestCasesCommand {
            source: TestCaseSource::RawText(DOCUMENT.to_string()),
            focus: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, GenerateTestCasesError::MalformedArray(_)));
}

#[tokio::test]
async fn empty_array_is_no_test_cases() {
    let provider = Arc::new(MockAiProvider::new().with_response("[]"));
    let handler = GenerateTestCasesHandler::new(provider);

    let err = handler
        .handle(GenerateTestCasesCommand {
            source: TestCaseSource::RawText(DOCUMENT.to_string()),
            focus: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, GenerateTestCasesError::NoTestCases));
}

#[tokio::test]
async fn focus_directive_reaches_the_prompt() {
    let provider = Arc::new(MockAiProvider::new().with_response(TEST_CASE_REPLY));
    let handler = GenerateTestCasesHandler::new(provider.clone());

    handler
        .handle(GenerateTestCasesCommand {
            source: TestCaseSource::RawText(DOCUMENT.to_string()),
            focus: Some(FocusArea::Security),
        })
        .await
        .unwrap();

    let calls = provider.get_calls();
    assert_eq!(calls.len(), 1);
    let user_message = &calls[0].messages[0].content;
    assert!(user_message.contains("FOCUS:"));
    assert!(user_message.contains(FocusArea::Security.directive()));
}

// =============================================================================
// End-to-end
// =============================================================================

#[tokio::test]
async fn documents_flow_through_both_stages() {
    let extractor = PlainTextExtractor::new();
    let docs = vec![
        (
            "overview.md".to_string(),
            extractor
                .extract("overview.md", DOCUMENT.as_bytes())
                .unwrap(),
        ),
        (
            "notes.txt".to_string(),
            extractor
                .extract(
                    "notes.txt",
                    b"Approved invoices must post to the ledger within one business day.",
                )
                .unwrap(),
        ),
    ];
    let combined = combine_documents(&docs);
    assert!(combined.contains("=== DOCUMENT 1: overview.md ==="));
    assert!(combined.contains("=== END OF notes.txt ==="));

    let provider = Arc::new(
        MockAiProvider::new()
            .with_response(SUMMARY_REPLY)
            .with_response(TEST_CASE_REPLY),
    );

    let summary = SummarizeHandler::new(provider.clone())
        .handle(SummarizeCommand {
            document_text: combined,
        })
        .await
        .unwrap();

    let cases = GenerateTestCasesHandler::new(provider.clone())
        .handle(GenerateTestCasesCommand {
            source: TestCaseSource::Summary(summary.clone()),
            focus: None,
        })
        .await
        .unwrap();

    assert_eq!(provider.call_count(), 2);
    assert_eq!(cases[0].related_requirement, "REQ-001");

    // The second call carries the serialized summary, not the raw documents.
    let calls = provider.get_calls();
    assert!(calls[1].messages[0]
        .content
        .contains("Invoice Portal Modernization"));
    assert!(calls[1].messages[0].content.contains("\"projectOverview\""));
}
