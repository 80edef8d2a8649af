//! Questions command implementation

use super::output::{self, OutputFormat};
use anyhow::Result;
use cape_rules::Question;
use serde::Serialize;
use std::path::PathBuf;

/// Configuration for questions command
pub struct QuestionsConfig {
    pub rules: Option<PathBuf>,
    pub answers: Option<PathBuf>,
    pub verbose: bool,
    pub output_format: Option<String>,
    pub output_file: Option<PathBuf>,
}

#[derive(Serialize)]
struct QuestionsReport<'a> {
    tool_id: &'a str,
    /// First visible question without an answer
    next: Option<&'a str>,
    visible: Vec<&'a Question>,
}

/// List the questions visible under the given answers
pub fn questions(config: QuestionsConfig) -> Result<()> {
    let engine = super::load_engine(config.rules.as_deref())?;
    let answers = super::load_answers(config.answers.as_deref())?;

    let visible = engine.visible_questions(&answers);
    if config.verbose {
        eprintln!("{} of {} questions visible", visible.len(), engine.questions().len());
    }

    let report = QuestionsReport {
        tool_id: engine.tool_id(),
        next: engine.next_question(&answers).map(|q| q.id.as_str()),
        visible,
    };
    output::print_output(
        &report,
        OutputFormat::from_option(config.output_format.as_deref()),
        config.output_file.as_deref(),
    )
}
