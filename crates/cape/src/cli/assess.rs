//! Assess command implementation

use super::output::{self, OutputFormat};
use crate::document::load_document;
use crate::report::assess_with_dapt;
use anyhow::{Context, Result};
use cape_clinical::{DrugVocabulary, PatientClinicalRecord};
use std::path::PathBuf;

/// Configuration for assess command
pub struct AssessConfig {
    pub record: PathBuf,
    /// Drug list, one name per line (first CSV column)
    pub drugs: Option<PathBuf>,
    /// DAPT rule set; the bundled one when absent
    pub rules: Option<PathBuf>,
    /// DAPT answers; without them the rule set is not run
    pub answers: Option<PathBuf>,
    pub verbose: bool,
    pub output_format: Option<String>,
    pub output_file: Option<PathBuf>,
}

/// Run every calculator over a patient record
pub fn assess(config: AssessConfig) -> Result<()> {
    let record: PatientClinicalRecord = load_document(&config.record)
        .with_context(|| format!("Failed to load patient record: {}", config.record.display()))?;

    let vocabulary = match &config.drugs {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read drug list: {}", path.display()))?;
            DrugVocabulary::from_lines(&text)
        }
        None => DrugVocabulary::built_in(),
    };

    let engine = super::load_engine(config.rules.as_deref())?;
    let answers = config
        .answers
        .as_deref()
        .map(|path| super::load_answers(Some(path)))
        .transpose()?;

    let report = assess_with_dapt(&record, &vocabulary, &engine, answers.as_ref())
        .context("Failed to run the DAPT rule set")?;

    if config.verbose {
        eprintln!(
            "{} drugs in vocabulary, {} medications unlisted",
            vocabulary.len(),
            report.assessment.unlisted_medications.len()
        );
    }
    for name in &report.assessment.unlisted_medications {
        eprintln!("{}", output::format_warning(&format!("medication '{name}' is not in the drug vocabulary")));
    }

    output::print_output(
        &report,
        OutputFormat::from_option(config.output_format.as_deref()),
        config.output_file.as_deref(),
    )
}
