//! CAPE error types

use crate::{ErrorCode, SourceLocation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The rule set cannot serve evaluations, or an evaluation cannot proceed
    Error,
    /// Potential issue, evaluation can continue
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message attached to an element of a rule set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: ErrorCode,
    pub message: String,
    /// Id of the question or output rule the diagnostic is about
    pub subject: Option<String>,
    /// Location inside the subject's expression, when there is one
    pub location: Option<SourceLocation>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            subject: None,
            location: None,
            help: code.info().help.map(str::to_string),
        }
    }

    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(code, message)
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render with terminal colors (severity and code highlighted)
    #[cfg(feature = "colored")]
    pub fn render_colored(&self) -> String {
        use colored::Colorize;

        let severity = match self.severity {
            Severity::Error => self.severity.to_string().red().bold(),
            Severity::Warning => self.severity.to_string().yellow().bold(),
        };
        let mut out = format!("{}[{}]: {}", severity, self.code.to_string().bold(), self.message);
        if let Some(subject) = &self.subject {
            out.push_str(&format!(" ({})", subject.cyan()));
        }
        if let Some(loc) = &self.location {
            out.push_str(&format!(" at {}", loc));
        }
        if let Some(help) = &self.help {
            out.push_str(&format!("\n  {} {}", "help:".green(), help));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(subject) = &self.subject {
            write!(f, " ({})", subject)?;
        }
        if let Some(loc) = &self.location {
            write!(f, " at {}", loc)?;
        }
        Ok(())
    }
}

/// Main CAPE error type
///
/// `ConfigLoad` is fatal: an engine that fails to load never serves evaluations.
/// `Evaluation` and `Validation` are recoverable per call and leave the engine untouched.
#[derive(Debug, Clone, Error)]
pub enum CapeError {
    /// A predicate expression could not be parsed
    #[error("{code}: {message}")]
    Parse {
        code: ErrorCode,
        message: String,
        expression: String,
        location: Option<SourceLocation>,
    },

    /// The rule configuration is missing, unreadable or structurally invalid
    #[error("{code}: {message}")]
    ConfigLoad {
        code: ErrorCode,
        message: String,
        /// File name or other origin of the configuration
        origin: Option<String>,
    },

    /// A predicate referenced an undeclared variable or was otherwise malformed
    #[error("{code}: {message}")]
    Evaluation {
        code: ErrorCode,
        message: String,
        rule_id: Option<String>,
        location: Option<SourceLocation>,
    },

    /// An answer was rejected before reaching the engine
    #[error("{code}: {message}")]
    Validation {
        code: ErrorCode,
        message: String,
        question_id: String,
        value: Option<String>,
    },

    /// I/O or internal failure
    #[error("{code}: {message}")]
    System { code: ErrorCode, message: String },

    /// Multiple errors collected
    #[error("Multiple errors: {}", .0.len())]
    Multiple(Vec<CapeError>),
}

impl CapeError {
    pub fn parse(code: ErrorCode, message: impl Into<String>, expression: impl Into<String>) -> Self {
        Self::Parse {
            code,
            message: message.into(),
            expression: expression.into(),
            location: None,
        }
    }

    pub fn parse_at(
        code: ErrorCode,
        message: impl Into<String>,
        expression: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self::Parse {
            code,
            message: message.into(),
            expression: expression.into(),
            location: Some(location),
        }
    }

    pub fn config(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::ConfigLoad {
            code,
            message: message.into(),
            origin: None,
        }
    }

    pub fn evaluation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Evaluation {
            code,
            message: message.into(),
            rule_id: None,
            location: None,
        }
    }

    pub fn validation(
        code: ErrorCode,
        message: impl Into<String>,
        question_id: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        Self::Validation {
            code,
            message: message.into(),
            question_id: question_id.into(),
            value,
        }
    }

    pub fn system(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::System {
            code,
            message: message.into(),
        }
    }

    /// Attach the configuration origin to a load error
    pub fn with_origin(self, name: impl Into<String>) -> Self {
        match self {
            Self::ConfigLoad { code, message, .. } => Self::ConfigLoad {
                code,
                message,
                origin: Some(name.into()),
            },
            other => other,
        }
    }

    /// Attach the failing rule id to an evaluation error
    pub fn with_rule(self, id: impl Into<String>) -> Self {
        match self {
            Self::Evaluation {
                code,
                message,
                location,
                ..
            } => Self::Evaluation {
                code,
                message,
                rule_id: Some(id.into()),
                location,
            },
            other => other,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Parse { code, .. }
            | Self::ConfigLoad { code, .. }
            | Self::Evaluation { code, .. }
            | Self::Validation { code, .. }
            | Self::System { code, .. } => *code,
            Self::Multiple(errors) => errors.first().map(|e| e.code()).unwrap_or(ErrorCode::new(0)),
        }
    }

    /// Whether the caller may keep using the engine after this error
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Evaluation { .. } | Self::Validation { .. } => true,
            Self::Multiple(errors) => errors.iter().all(Self::is_recoverable),
            _ => false,
        }
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::Parse { location, .. } | Self::Evaluation { location, .. } => location.as_ref(),
            _ => None,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Parse { code, message, location, .. } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(loc) = location {
                    diag = diag.with_location(loc.clone());
                }
                diag
            }
            Self::ConfigLoad { code, message, origin } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(origin) = origin {
                    diag = diag.with_subject(origin.clone());
                }
                diag
            }
            Self::Evaluation {
                code,
                message,
                rule_id,
                location,
            } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(id) = rule_id {
                    diag = diag.with_subject(id.clone());
                }
                if let Some(loc) = location {
                    diag = diag.with_location(loc.clone());
                }
                diag
            }
            Self::Validation {
                code,
                message,
                question_id,
                ..
            } => Diagnostic::error(*code, message.clone()).with_subject(question_id.clone()),
            Self::System { code, message } => Diagnostic::error(*code, message.clone()),
            Self::Multiple(errors) => match errors.first() {
                Some(first) => first.to_diagnostic(),
                None => Diagnostic::error(ErrorCode::new(0), "Unknown error"),
            },
        }
    }
}
