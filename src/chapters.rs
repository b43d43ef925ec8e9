//! Chapter generator
//!
//! Turns a (subject name, grade) pair into an ordered list of chapter
//! titles by asking the completion service and splitting its reply into
//! lines.

use thiserror::Error;
use tracing::{info, instrument};

use crate::completion::{CompletionClient, UpstreamError};

#[derive(Error, Debug)]
pub enum ChapterError {
    #[error("chapter generation failed: {0}")]
    GenerationFailure(#[from] UpstreamError),
    #[error("completion service returned no chapters")]
    EmptyResult,
}

/// Builds the prompt sent to the completion service
pub fn chapter_prompt(subject_name: &str, grade: &str) -> String {
    format!(
        "List the chapters of a standard grade {grade} {subject_name} textbook. \
         Reply with one chapter per line in the form \"Chapter N: Title\" and nothing else."
    )
}

/// Splits a free-text reply into trimmed, non-empty lines
///
/// Lines are not checked against the "Chapter N: Title" shape.
pub fn parse_chapter_lines(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Asks the completion service for the chapters of a subject at a grade
///
/// ### Errors
///
/// * `GenerationFailure` if the completion call fails for any reason
/// * `EmptyResult` if the reply contains no non-empty lines
#[instrument(skip(client))]
pub async fn generate_chapters(
    client: &CompletionClient,
    subject_name: &str,
    grade: &str,
) -> Result<Vec<String>, ChapterError> {
    let reply = client.complete(&chapter_prompt(subject_name, grade)).await?;
    let chapters = parse_chapter_lines(&reply);

    if chapters.is_empty() {
        return Err(ChapterError::EmptyResult);
    }

    info!("Generated {} chapters", chapters.len());
    Ok(chapters)
}
