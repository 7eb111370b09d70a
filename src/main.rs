//! CaseForge CLI - summarize requirement documents and generate test cases.
//!
//! Usage:
//!
//! ```text
//! caseforge [--focus <area>] <file> [<file>...]
//! ```
//!
//! Reads the given documents, produces a structured summary and a set of
//! test cases, and prints both as JSON to stdout. Requires
//! `CASEFORGE__AI__API_KEY` in the environment or a `.env` file.

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use caseforge::adapters::text::{combine_documents, PlainTextExtractor};
use caseforge::adapters::{GroqConfig, GroqProvider};
use caseforge::application::{
    FocusArea, GenerateTestCasesCommand, GenerateTestCasesHandler, SummarizeCommand,
    SummarizeHandler, TestCaseSource,
};
use caseforge::config::AppConfig;
use caseforge::ports::TextExtractor;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (focus, files) = parse_args(std::env::args().skip(1))?;
    if files.is_empty() {
        return Err("usage: caseforge [--focus <area>] <file> [<file>...]".into());
    }

    let config = AppConfig::load()?;
    config.validate()?;

    let extractor = PlainTextExtractor::new();
    let mut documents = Vec::with_capacity(files.len());
    for path in &files {
        let bytes = std::fs::read(path)?;
        let name = std::path::Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone());
        let content = extractor.extract(&name, &bytes)?;
        documents.push((name, content));
    }
    let combined = combine_documents(&documents);
    info!(files = files.len(), chars = combined.len(), "documents loaded");

    let ai = &config.ai;
    let provider_config = GroqConfig::new(ai.api_key().unwrap_or_default())
        .with_model(&ai.model)
        .with_base_url(&ai.base_url)
        .with_timeout(ai.timeout());
    let provider = Arc::new(GroqProvider::new(provider_config));

    let summarize = SummarizeHandler::new(provider.clone());
    let summary = summarize
        .handle(SummarizeCommand { document_text: combined })
        .await?;
    info!(
        requirements = summary.functional_requirements.len(),
        stories = summary.user_stories.len(),
        "summary produced"
    );

    let generate = GenerateTestCasesHandler::new(provider);
    let test_cases = generate
        .handle(GenerateTestCasesCommand {
            source: TestCaseSource::Summary(summary.clone()),
            focus,
        })
        .await?;
    info!(test_cases = test_cases.len(), "test cases generated");

    let output = serde_json::json!({
        "summary": summary,
        "testCases": test_cases,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn parse_args(
    args: impl Iterator<Item = String>,
) -> Result<(Option<FocusArea>, Vec<String>), Box<dyn std::error::Error>> {
    let mut focus = None;
    let mut files = Vec::new();
    let mut args = args.peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--focus" => {
                let value = args.next().ok_or("--focus requires a value")?;
                focus = Some(value.parse::<FocusArea>()?);
            }
            _ => files.push(arg),
        }
    }
    Ok((focus, files))
}
