//! Perioperative cardiac decision support
//!
//! This crate bundles the CAPE engine:
//! - A declarative rule engine for questionnaire-driven decision tools
//!   ([`rules`]), with a bundled DAPT rule set
//! - The restricted predicate language used by output rules ([`ast`], [`parser`])
//! - Clinical value tables and deterministic calculators ([`clinical`])
//!
//! # Example
//!
//! ```
//! use cape::{AnswerContext, RuleEngine};
//!
//! let engine = RuleEngine::bundled_dapt()?;
//! let answers = AnswerContext::new()
//!     .with("pci_lt_1m", "yes")
//!     .with("high_bleeding_risk_ncs", "no");
//! let outcome = engine.evaluate(&answers)?;
//! assert_eq!(outcome.rule_id, "continue_dapt");
//! # Ok::<(), cape::CapeError>(())
//! ```

pub use cape_ast as ast;
pub use cape_clinical as clinical;
pub use cape_diagnostics as diagnostics;
pub use cape_parser as parser;
pub use cape_rules as rules;

pub mod document;
pub mod report;

// Convenience re-exports
pub use cape_clinical::{assess, ClinicalAssessment, DrugVocabulary, PatientClinicalRecord};
pub use cape_diagnostics::{CapeError, Diagnostic, Result};
pub use cape_parser::parse_expression;
pub use cape_rules::{AnswerContext, RuleEngine, RuleOutcome, Value};
pub use document::{load_document, DocumentFormat};
pub use report::{assess_with_dapt, AssessmentReport};

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
