//! Evaluation errors for rule predicates

use cape_diagnostics::{CapeError, ErrorCode, SourceLocation, Span, CAPE0201, CAPE0202, CAPE0203, CAPE0204};
use thiserror::Error;

/// Result type for predicate evaluation
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors raised while evaluating a single predicate
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    /// Name outside the rule set's namespace
    #[error("Undeclared variable '{name}'")]
    UndeclaredVariable { name: String, span: Span },

    /// The predicate text did not parse
    #[error("Malformed predicate: {message}")]
    MalformedPredicate { message: String, span: Option<Span> },

    /// Operand types cannot be combined by the operator
    #[error("Type mismatch: cannot apply '{operator}' to {left} and {right}")]
    TypeMismatch {
        operator: String,
        left: String,
        right: String,
        span: Span,
    },

    /// A logical operator or the predicate as a whole produced a non-boolean
    #[error("Expected Boolean, found {found}")]
    NonBoolean { found: String, span: Span },
}

impl EvalError {
    pub fn undeclared(name: impl Into<String>, span: Span) -> Self {
        Self::UndeclaredVariable {
            name: name.into(),
            span,
        }
    }

    pub fn type_mismatch(
        operator: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
        span: Span,
    ) -> Self {
        Self::TypeMismatch {
            operator: operator.into(),
            left: left.into(),
            right: right.into(),
            span,
        }
    }

    pub fn non_boolean(found: impl Into<String>, span: Span) -> Self {
        Self::NonBoolean {
            found: found.into(),
            span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UndeclaredVariable { .. } => CAPE0201,
            Self::MalformedPredicate { .. } => CAPE0202,
            Self::TypeMismatch { .. } => CAPE0203,
            Self::NonBoolean { .. } => CAPE0204,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UndeclaredVariable { span, .. }
            | Self::TypeMismatch { span, .. }
            | Self::NonBoolean { span, .. } => Some(*span),
            Self::MalformedPredicate { span, .. } => *span,
        }
    }

    /// Convert into the crate-wide error, attaching the rule and a location
    /// inside its predicate text
    pub fn into_cape(self, rule_id: &str, source: &str) -> CapeError {
        let location = self.span().map(|span| SourceLocation::from_span(span, source));
        CapeError::Evaluation {
            code: self.code(),
            message: self.to_string(),
            rule_id: Some(rule_id.to_string()),
            location,
        }
    }
}

impl From<&CapeError> for EvalError {
    fn from(err: &CapeError) -> Self {
        let span = err
            .location()
            .map(|loc| Span::new(loc.offset, loc.offset + loc.length));
        let message = match err {
            CapeError::Parse { message, .. } => message.clone(),
            other => other.to_string(),
        };
        Self::MalformedPredicate { message, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_cape_carries_rule_and_location() {
        let err = EvalError::undeclared("foo", Span::new(9, 12));
        match err.into_cape("out_2", "x == 1 or foo") {
            CapeError::Evaluation {
                code,
                rule_id,
                location,
                ..
            } => {
                assert_eq!(code, CAPE0201);
                assert_eq!(rule_id.as_deref(), Some("out_2"));
                assert_eq!(location.map(|l| l.column), Some(10));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
