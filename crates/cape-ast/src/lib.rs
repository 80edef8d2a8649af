//! CAPE predicate abstract syntax tree
//!
//! Output rules select a recommendation with a `when` predicate. Predicates are
//! restricted to literals, named-variable lookups, comparison, membership and
//! boolean operators; this crate defines the tree those strings parse into.

mod expression;
mod literal;
mod operator;

pub use expression::*;
pub use literal::*;
pub use operator::*;

/// A node with source span information
pub type Spanned<T> = cape_diagnostics::Spanned<T>;

/// Type alias for boxed expressions
pub type BoxExpr = Box<Spanned<Expression>>;
