//! Rule-set configuration documents
//!
//! A rule set is a YAML or JSON document:
//!
//! ```yaml
//! tool_id: dapt
//! title: Perioperative DAPT management
//! boolean_coding: { yes: "yes", no: "no" }
//! variables: [p2y12_agent]
//! questions:
//!   - id: pci_lt_1m
//!     text: PCI within the last month?
//!     options: ["yes", "no"]
//! outputs:
//!   - id: continue_dapt
//!     when: "pci_lt_1m == 'yes'"
//!     recommendation_text: Continue DAPT.
//!     class: I
//! ```
//!
//! This module only deserializes; structural checks live in [`crate::rules`].

use crate::Value;
use cape_diagnostics::{CapeError, Result, CAPE0100, CAPE0101, CAPE0102};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Strings used for yes/no answers in a rule set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanCoding {
    pub yes: String,
    pub no: String,
}

impl Default for BooleanCoding {
    fn default() -> Self {
        Self::new("yes", "no")
    }
}

impl BooleanCoding {
    pub fn new(yes: impl Into<String>, no: impl Into<String>) -> Self {
        Self {
            yes: yes.into(),
            no: no.into(),
        }
    }

    /// An unanswered flag is not "yes"
    pub fn is_yes(&self, value: Option<&Value>) -> bool {
        value.is_some_and(|v| v.matches_text(&self.yes))
    }

    pub fn yes_value(&self) -> Value {
        Value::string(&self.yes)
    }

    pub fn no_value(&self) -> Value {
        Value::string(&self.no)
    }

    pub fn encode(&self, flag: bool) -> Value {
        if flag { self.yes_value() } else { self.no_value() }
    }
}

/// How a question is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// One of the listed options
    #[default]
    Choice,
    /// Free text; options, if any, are suggestions only
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestionConfig {
    pub id: String,
    #[serde(alias = "text_tr")]
    pub text: String,
    #[serde(rename = "type", default)]
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_if: Option<IndexMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub id: String,
    pub when: String,
    #[serde(alias = "recommendation_tr")]
    pub recommendation_text: String,
    #[serde(default)]
    pub class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSetConfig {
    pub tool_id: String,
    #[serde(default, alias = "title_tr", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub boolean_coding: BooleanCoding,
    /// Names supplied by the caller that are not questions (e.g. `p2y12_agent`)
    #[serde(default)]
    pub variables: Vec<String>,
    #[serde(default)]
    pub questions: Vec<QuestionConfig>,
    #[serde(default)]
    pub outputs: Vec<OutputConfig>,
}

/// Classify a serde message: missing fields get their own code
fn document_error(message: String) -> CapeError {
    let code = if message.contains("missing field") {
        CAPE0102
    } else {
        CAPE0101
    };
    CapeError::config(code, message)
}

impl RuleSetConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        serde_yaml::from_str(source).map_err(|e| document_error(e.to_string()))
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|e| document_error(e.to_string()))
    }

    /// Read a rule set from disk; `.json` files are JSON, anything else YAML
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let source = std::fs::read_to_string(path).map_err(|e| {
            CapeError::config(CAPE0100, format!("cannot read rule set: {e}")).with_origin(&origin)
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Self::from_json_str(&source)
        } else {
            Self::from_yaml_str(&source)
        };
        parsed.map_err(|e| e.with_origin(origin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_turkish_aliases() {
        let cfg = RuleSetConfig::from_yaml_str(
            r#"
tool_id: dapt
title_tr: "Tool-1"
boolean_coding: { yes: "Evet", no: "Hayır" }
questions:
  - id: pci_lt_1m
    text_tr: "PCI < 1 ay?"
    type: choice
    options: ["Evet", "Hayır"]
outputs:
  - id: o1
    when: "pci_lt_1m == 'Evet'"
    recommendation_tr: "Ertele."
    class: "I"
"#,
        )
        .unwrap();

        assert_eq!(cfg.title.as_deref(), Some("Tool-1"));
        assert_eq!(cfg.boolean_coding, BooleanCoding::new("Evet", "Hayır"));
        assert_eq!(cfg.questions[0].text, "PCI < 1 ay?");
        assert_eq!(cfg.outputs[0].recommendation_text, "Ertele.");
    }

    #[test]
    fn test_defaults() {
        let cfg = RuleSetConfig::from_json_str(
            r#"{"tool_id": "t", "questions": [{"id": "q", "text": "Q?"}]}"#,
        )
        .unwrap();
        assert_eq!(cfg.boolean_coding, BooleanCoding::default());
        assert_eq!(cfg.questions[0].kind, QuestionKind::Choice);
        assert!(cfg.questions[0].options.is_empty());
        assert!(cfg.outputs.is_empty());
    }

    #[test]
    fn test_missing_field_code() {
        let err = RuleSetConfig::from_yaml_str("tool_id: t\noutputs:\n  - id: o1\n    when: 'true'\n")
            .unwrap_err();
        assert_eq!(err.code(), CAPE0102);

        let err = RuleSetConfig::from_yaml_str("tool_id: [unclosed").unwrap_err();
        assert_eq!(err.code(), CAPE0101);
    }
}
