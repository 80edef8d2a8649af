//! Literal AST nodes

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// A literal value in a predicate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    /// `null` / `None`
    Null,
    /// `true` / `false` (`True` / `False` are accepted too)
    Boolean(bool),
    /// Integer or decimal number, e.g. `30` or `2.0`
    Number(Decimal),
    /// Single- or double-quoted string
    String(String),
}

impl Literal {
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Boolean(_) => "Boolean",
            Self::Number(_) => "Number",
            Self::String(_) => "String",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
        }
    }
}
