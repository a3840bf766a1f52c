//! The op itself: greet, ask, report the answer back.
use anyhow::Context;

use crate::client::{Client, InputOptions, Metadata};

pub const HOWDY: &str = "👋 How are you today?";
pub const TAGS: [&str; 3] = ["demo", "track", "rust"];
pub const LANGUAGE: &str = "rust";
pub const ANSWER_FIELD: &str = "answer";
pub const RESPONSE_PREFIX: &str = "👉 Answer: ";

pub fn metadata() -> Metadata {
    Metadata::from([("language".to_owned(), serde_json::Value::from(LANGUAGE))])
}

pub fn format_response(answer: &str) -> String {
    format!("{RESPONSE_PREFIX}{answer}")
}

/// Runs the op against `client` and returns the response it printed.
/// Stops at the first failing call.
pub fn run(client: &mut Client) -> anyhow::Result<String> {
    let metadata = metadata();

    client
        .track(&TAGS, HOWDY, &metadata)
        .context("Failed to track the greeting event")?;

    let answer = client
        .input(ANSWER_FIELD, HOWDY, &InputOptions::default().allow_empty(false))
        .context("Failed to prompt for an answer")?;

    let response = format_response(&answer);
    client
        .track(&TAGS, &response, &metadata)
        .context("Failed to track the answer event")?;

    client
        .print(&response)
        .context("Failed to print the response")?;

    Ok(response)
}
