//! CAPE diagnostics and error handling
//!
//! This crate provides the error handling infrastructure shared by the rule engine,
//! the predicate parser and the clinical calculators: structured error codes,
//! the [`CapeError`] taxonomy, source locations and diagnostic reporting.

mod error;
mod error_code;
mod span;

pub use error::*;
pub use error_code::*;
pub use span::*;

/// Result type for CAPE operations
pub type Result<T> = std::result::Result<T, CapeError>;
