//! CLI functionality for the cape tool
//!
//! Each subcommand takes a `XxxConfig` and prints a JSON document; the
//! CLI only orchestrates the library and does no clinical formatting.

pub mod assess;
pub mod check;
pub mod evaluate;
pub mod output;
pub mod questions;

use crate::document::load_document;
use anyhow::{Context, Result};
use cape_rules::{AnswerContext, RuleEngine};
use std::path::Path;

/// Load the rule set at `path`, or the bundled DAPT rule set
pub fn load_engine(path: Option<&Path>) -> Result<RuleEngine> {
    match path {
        Some(path) => RuleEngine::from_path(path)
            .with_context(|| format!("Failed to load rule set: {}", path.display())),
        None => RuleEngine::bundled_dapt().context("Failed to load the bundled DAPT rule set"),
    }
}

/// Load an answer document; no path means no answers
pub fn load_answers(path: Option<&Path>) -> Result<AnswerContext> {
    match path {
        Some(path) => load_document(path).with_context(|| format!("Failed to load answers: {}", path.display())),
        None => Ok(AnswerContext::new()),
    }
}
