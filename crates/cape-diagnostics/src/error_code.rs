//! CAPE error codes following a structured numbering system
//!
//! Error code ranges:
//! - CAPE0001-CAPE0099: Predicate parse errors (syntax of `when` expressions)
//! - CAPE0100-CAPE0199: Rule-set load errors (structure of the configuration)
//! - CAPE0200-CAPE0299: Evaluation errors (predicate evaluation at runtime)
//! - CAPE0300-CAPE0399: Validation errors (answers rejected at the engine boundary)
//! - CAPE0400-CAPE0499: System errors (I/O, internal)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Static description and help for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    pub const fn is_parse_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    pub const fn is_config_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    pub const fn is_evaluation_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    pub const fn is_validation_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    pub const fn is_system_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CAPE{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    pub description: &'static str,
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Parse errors (0001-0099)
    map.insert(1, ErrorInfo::new("Unexpected token"));
    map.insert(2, ErrorInfo::new("Unexpected end of input"));
    map.insert(3, ErrorInfo::new("Unterminated string literal"));
    map.insert(4, ErrorInfo::new("Invalid number literal"));
    map.insert(5, ErrorInfo::new("Expected expression"));
    map.insert(6, ErrorInfo::new("Trailing input after expression")
        .with_help("Combine clauses with 'and' / 'or'"));
    map.insert(7, ErrorInfo::new("Expression nested too deeply")
        .with_help("Flatten nested parentheses or repeated 'not'"));

    // Rule-set load errors (0100-0199)
    map.insert(100, ErrorInfo::new("Rule set could not be read"));
    map.insert(101, ErrorInfo::new("Rule set document is malformed"));
    map.insert(102, ErrorInfo::new("Missing required field"));
    map.insert(103, ErrorInfo::new("Duplicate question id"));
    map.insert(104, ErrorInfo::new("Duplicate output rule id"));
    map.insert(105, ErrorInfo::new("Visibility condition references an unknown question"));
    map.insert(106, ErrorInfo::new("Visibility condition references a later question")
        .with_help("A question may only depend on questions declared before it"));
    map.insert(107, ErrorInfo::new("Visibility value is not one of the referenced question's options"));
    map.insert(108, ErrorInfo::new("Name collides with a derived variable"));
    map.insert(109, ErrorInfo::new("Duplicate option value"));
    map.insert(110, ErrorInfo::new("Duplicate variable name"));

    // Evaluation errors (0200-0299)
    map.insert(200, ErrorInfo::new("Evaluation failed"));
    map.insert(201, ErrorInfo::new("Undeclared variable")
        .with_help("Predicates may only reference question ids, declared variables and derived variables"));
    map.insert(202, ErrorInfo::new("Malformed predicate expression"));
    map.insert(203, ErrorInfo::new("Type mismatch"));
    map.insert(204, ErrorInfo::new("Predicate did not produce a boolean"));

    // Validation errors (0300-0399)
    map.insert(300, ErrorInfo::new("Invalid answer"));
    map.insert(301, ErrorInfo::new("Answer is not one of the question's options"));
    map.insert(302, ErrorInfo::new("Answer for an unknown question"));
    map.insert(303, ErrorInfo::new("Derived variables cannot be answered")
        .with_help("Derived variables are computed by the engine on every evaluation"));

    // System errors (0400-0499)
    map.insert(400, ErrorInfo::new("Internal error"));
    map.insert(401, ErrorInfo::new("I/O error"));

    map
});

// Parse errors
pub const CAPE0001: ErrorCode = ErrorCode::new(1);
pub const CAPE0002: ErrorCode = ErrorCode::new(2);
pub const CAPE0003: ErrorCode = ErrorCode::new(3);
pub const CAPE0004: ErrorCode = ErrorCode::new(4);
pub const CAPE0005: ErrorCode = ErrorCode::new(5);
pub const CAPE0006: ErrorCode = ErrorCode::new(6);
pub const CAPE0007: ErrorCode = ErrorCode::new(7);

// Rule-set load errors
pub const CAPE0100: ErrorCode = ErrorCode::new(100);
pub const CAPE0101: ErrorCode = ErrorCode::new(101);
pub const CAPE0102: ErrorCode = ErrorCode::new(102);
pub const CAPE0103: ErrorCode = ErrorCode::new(103);
pub const CAPE0104: ErrorCode = ErrorCode::new(104);
pub const CAPE0105: ErrorCode = ErrorCode::new(105);
pub const CAPE0106: ErrorCode = ErrorCode::new(106);
pub const CAPE0107: ErrorCode = ErrorCode::new(107);
pub const CAPE0108: ErrorCode = ErrorCode::new(108);
pub const CAPE0109: ErrorCode = ErrorCode::new(109);
pub const CAPE0110: ErrorCode = ErrorCode::new(110);

// Evaluation errors
pub const CAPE0200: ErrorCode = ErrorCode::new(200);
pub const CAPE0201: ErrorCode = ErrorCode::new(201);
pub const CAPE0202: ErrorCode = ErrorCode::new(202);
pub const CAPE0203: ErrorCode = ErrorCode::new(203);
pub const CAPE0204: ErrorCode = ErrorCode::new(204);

// Validation errors
pub const CAPE0300: ErrorCode = ErrorCode::new(300);
pub const CAPE0301: ErrorCode = ErrorCode::new(301);
pub const CAPE0302: ErrorCode = ErrorCode::new(302);
pub const CAPE0303: ErrorCode = ErrorCode::new(303);

// System errors
pub const CAPE0400: ErrorCode = ErrorCode::new(400);
pub const CAPE0401: ErrorCode = ErrorCode::new(401);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(CAPE0001.to_string(), "CAPE0001");
        assert_eq!(CAPE0303.to_string(), "CAPE0303");
    }

    #[test]
    fn test_error_categories() {
        assert!(CAPE0002.is_parse_error());
        assert!(CAPE0106.is_config_error());
        assert!(!CAPE0106.is_parse_error());
        assert!(CAPE0201.is_evaluation_error());
        assert!(CAPE0301.is_validation_error());
        assert!(CAPE0401.is_system_error());
    }

    #[test]
    fn test_error_info() {
        assert_eq!(CAPE0103.info().description, "Duplicate question id");
        assert!(CAPE0201.info().help.is_some());
        assert_eq!(ErrorCode::new(999).info().description, "Unknown error");
    }
}
