//! Predicate operator implementations
//!
//! - Logical operators (and, or, not) with three-valued logic
//! - Comparison operators (==, !=, <, <=, >, >=) and list membership

pub mod comparison;
pub mod logical;

pub use comparison::compare_values;
