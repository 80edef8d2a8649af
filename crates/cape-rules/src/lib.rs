//! Declarative rule engine for CAPE decision tools
//!
//! A rule set is an ordered list of questions (each optionally visible only
//! once earlier answers hold given values) and an ordered list of output rules,
//! each guarded by a predicate in a restricted boolean language. Evaluation
//! validates the answers, computes derived variables into a fresh context and
//! returns the first output rule whose predicate is true.
//!
//! ```
//! use cape_rules::{AnswerContext, RuleEngine};
//!
//! let engine = RuleEngine::bundled_dapt().unwrap();
//! let answers = AnswerContext::new()
//!     .with("pci_lt_1m", "no")
//!     .with("acs_lt_3m", "no")
//!     .with("high_stent_thrombosis_risk", "no")
//!     .with("high_bleeding_risk_ncs", "no");
//! let outcome = engine.evaluate(&answers).unwrap();
//! assert_eq!(outcome.rule_id, "continue_dapt");
//! ```

pub mod config;
pub mod context;
pub mod derive;
pub mod engine;
pub mod error;
pub mod operators;
pub mod rules;
pub mod value;

pub use config::{BooleanCoding, QuestionKind, RuleSetConfig};
pub use context::{AnswerContext, EnrichedContext, EvaluationContext, Namespace};
pub use derive::{default_derivations, derive_variables, Derivation, HighThromboticRisk};
pub use engine::PredicateEngine;
pub use error::{EvalError, EvalResult};
pub use rules::{OutputRule, Question, RuleEngine, RuleOutcome, NO_MATCH_ID, NO_MATCH_MESSAGE};
pub use value::Value;
