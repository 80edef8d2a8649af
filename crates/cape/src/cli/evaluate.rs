//! Evaluate command implementation

use super::output::{self, OutputFormat};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Configuration for evaluate command
pub struct EvaluateConfig {
    pub rules: Option<PathBuf>,
    pub answers: Option<PathBuf>,
    /// Extra answers (id=value), applied after the answer file
    pub set: Vec<String>,
    pub verbose: bool,
    pub output_format: Option<String>,
    pub output_file: Option<PathBuf>,
}

/// Evaluate a rule set and print the selected outcome
pub fn evaluate(config: EvaluateConfig) -> Result<()> {
    let engine = super::load_engine(config.rules.as_deref())?;
    let mut answers = super::load_answers(config.answers.as_deref())?;
    for assignment in &config.set {
        let (id, value) = parse_assignment(assignment)?;
        answers.set(id, value);
    }

    let outcome = engine
        .evaluate(&answers)
        .with_context(|| format!("Evaluation of '{}' failed", engine.tool_id()))?;

    if config.verbose {
        eprintln!("{} answers, selected rule {}", answers.len(), outcome.rule_id);
    }
    if !outcome.is_match() {
        eprintln!("{}", output::format_warning("no output rule matched the answers"));
    }

    output::print_output(
        &outcome,
        OutputFormat::from_option(config.output_format.as_deref()),
        config.output_file.as_deref(),
    )
}

/// Parse an `id=value` assignment
pub fn parse_assignment(text: &str) -> Result<(&str, &str)> {
    let (id, value) = text
        .split_once('=')
        .with_context(|| format!("Invalid answer '{text}', expected id=value"))?;
    let id = id.trim();
    if id.is_empty() {
        anyhow::bail!("Invalid answer '{text}', the id is empty");
    }
    Ok((id, value.trim()))
}
