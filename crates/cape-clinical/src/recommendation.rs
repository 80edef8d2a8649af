use serde::Serialize;

/// Structured text fragments produced by a calculator
///
/// Fragments are left unformatted; assembling them into a document is up to
/// the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClinicalRecommendation {
    pub summary: String,
    pub stop_plan: String,
    pub bridging_plan: String,
    pub restart_plan: String,
    pub cautions: Vec<String>,
    pub warnings: Vec<String>,
    pub classification: String,
}

impl ClinicalRecommendation {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Self::default()
        }
    }

    pub fn with_stop_plan(mut self, text: impl Into<String>) -> Self {
        self.stop_plan = text.into();
        self
    }

    pub fn with_bridging_plan(mut self, text: impl Into<String>) -> Self {
        self.bridging_plan = text.into();
        self
    }

    pub fn with_restart_plan(mut self, text: impl Into<String>) -> Self {
        self.restart_plan = text.into();
        self
    }

    pub fn with_classification(mut self, label: impl Into<String>) -> Self {
        self.classification = label.into();
        self
    }

    pub fn with_caution(mut self, text: impl Into<String>) -> Self {
        self.cautions.push(text.into());
        self
    }

    pub fn with_warning(mut self, text: impl Into<String>) -> Self {
        self.warnings.push(text.into());
        self
    }
}
