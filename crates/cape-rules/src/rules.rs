//! The rule engine: questions, visibility, validation and first-match selection

use crate::config::{BooleanCoding, OutputConfig, QuestionConfig, QuestionKind, RuleSetConfig};
use crate::context::{EvaluationContext, Namespace};
use crate::derive::{default_derivations, derive_variables, Derivation};
use crate::error::EvalError;
use crate::{AnswerContext, EnrichedContext, PredicateEngine, Value};
use cape_ast::{BinaryOp, Expression, Literal, Spanned};
use cape_diagnostics::{
    CapeError, Diagnostic, Result, SourceLocation, CAPE0102, CAPE0103, CAPE0104, CAPE0105,
    CAPE0106, CAPE0107, CAPE0108, CAPE0109, CAPE0110, CAPE0201, CAPE0202, CAPE0301, CAPE0302,
    CAPE0303,
};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Id of the outcome returned when no output rule fires
pub const NO_MATCH_ID: &str = "no_match";

/// Fallback recommendation for the no-match outcome
pub const NO_MATCH_MESSAGE: &str =
    "No recommendation matched the given answers. Please review the answers.";

const BUNDLED_DAPT: &str = include_str!("../rules/dapt.yaml");

/// A question definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub kind: QuestionKind,
    pub options: Vec<String>,
    /// Prerequisite answers, all of which must match; empty means always visible
    pub visible_if: IndexMap<String, String>,
}

impl Question {
    pub fn is_visible(&self, answers: &AnswerContext) -> bool {
        self.visible_if
            .iter()
            .all(|(id, required)| answers.get(id).is_some_and(|v| v.matches_text(required)))
    }

    /// Whether `value` is an acceptable answer
    ///
    /// Choice questions with a non-empty option set accept only those options;
    /// null is always accepted and means "unanswered".
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_null() || self.kind == QuestionKind::Text || self.options.is_empty() {
            return true;
        }
        self.options.iter().any(|opt| value.matches_text(opt))
    }
}

/// An output rule; its predicate is parsed once, at load
#[derive(Debug, Clone)]
pub struct OutputRule {
    pub id: String,
    pub when: String,
    pub recommendation_text: String,
    pub classification: String,
    predicate: std::result::Result<Spanned<Expression>, CapeError>,
}

impl OutputRule {
    fn from_config(cfg: OutputConfig) -> Self {
        let predicate = cape_parser::parse_expression(&cfg.when);
        Self {
            id: cfg.id,
            when: cfg.when,
            recommendation_text: cfg.recommendation_text.trim().to_string(),
            classification: cfg.class.trim().to_string(),
            predicate,
        }
    }

    /// The parsed predicate, or the error that kept it from parsing
    pub fn predicate(&self) -> std::result::Result<&Spanned<Expression>, &CapeError> {
        self.predicate.as_ref()
    }
}

/// Result of an evaluation: the selected rule, or the no-match sentinel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleOutcome {
    pub rule_id: String,
    pub recommendation_text: String,
    pub classification: String,
    /// Derived variables as computed for this evaluation
    pub derived: IndexMap<String, Value>,
}

impl RuleOutcome {
    fn matched(rule: &OutputRule, derived: IndexMap<String, Value>) -> Self {
        Self {
            rule_id: rule.id.clone(),
            recommendation_text: rule.recommendation_text.clone(),
            classification: rule.classification.clone(),
            derived,
        }
    }

    fn no_match(derived: IndexMap<String, Value>) -> Self {
        Self {
            rule_id: NO_MATCH_ID.to_string(),
            recommendation_text: NO_MATCH_MESSAGE.to_string(),
            classification: String::new(),
            derived,
        }
    }

    pub fn is_match(&self) -> bool {
        self.rule_id != NO_MATCH_ID
    }
}

/// A loaded, immutable rule set
///
/// Construction is the only fallible step that concerns the rule set itself;
/// evaluation errors are per call and leave the engine unchanged. The engine is
/// `Send + Sync` and may be shared across threads.
pub struct RuleEngine {
    tool_id: String,
    title: Option<String>,
    coding: BooleanCoding,
    questions: Vec<Question>,
    variables: IndexSet<String>,
    outputs: Vec<OutputRule>,
    derivations: Vec<Box<dyn Derivation>>,
    namespace: Namespace,
    evaluator: PredicateEngine,
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("tool_id", &self.tool_id)
            .field("questions", &self.questions.len())
            .field("outputs", &self.outputs.len())
            .finish_non_exhaustive()
    }
}

impl RuleEngine {
    /// Build an engine with the default derived variables
    pub fn from_config(config: RuleSetConfig) -> Result<Self> {
        Self::with_derivations(config, default_derivations())
    }

    pub fn with_derivations(config: RuleSetConfig, derivations: Vec<Box<dyn Derivation>>) -> Result<Self> {
        if config.tool_id.trim().is_empty() {
            return Err(CapeError::config(CAPE0102, "rule set has an empty 'tool_id'"));
        }

        let derived: IndexSet<&str> = derivations.iter().map(|d| d.name()).collect();
        let questions = build_questions(config.questions, &derived)?;
        let variables = build_variables(config.variables, &questions, &derived)?;
        let outputs = build_outputs(config.outputs)?;

        let namespace = Namespace::new(
            questions
                .iter()
                .map(|q| q.id.as_str())
                .chain(variables.iter().map(String::as_str))
                .chain(derived.iter().copied()),
        );

        log::info!(
            "loaded rule set '{}': {} questions, {} variables, {} output rules",
            config.tool_id,
            questions.len(),
            variables.len(),
            outputs.len()
        );
        for rule in &outputs {
            if let Err(e) = rule.predicate() {
                log::warn!("output rule '{}' has a malformed predicate: {}", rule.id, e);
            }
        }

        Ok(Self {
            tool_id: config.tool_id,
            title: config.title,
            coding: config.boolean_coding,
            questions,
            variables,
            outputs,
            derivations,
            namespace,
            evaluator: PredicateEngine::new(),
        })
    }

    pub fn from_yaml_str(source: &str) -> Result<Self> {
        Self::from_config(RuleSetConfig::from_yaml_str(source)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        Self::from_config(RuleSetConfig::from_json_str(source)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = RuleSetConfig::from_path(path)?;
        Self::from_config(config).map_err(|e| e.with_origin(path.display().to_string()))
    }

    /// The DAPT rule set shipped with the crate
    pub fn bundled_dapt() -> Result<Self> {
        Self::from_yaml_str(BUNDLED_DAPT).map_err(|e| e.with_origin("rules/dapt.yaml"))
    }

    pub fn tool_id(&self) -> &str {
        &self.tool_id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn boolean_coding(&self) -> &BooleanCoding {
        &self.coding
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(String::as_str)
    }

    pub fn outputs(&self) -> &[OutputRule] {
        &self.outputs
    }

    /// Names of the derived variables, in computation order
    pub fn derived_names(&self) -> impl Iterator<Item = &str> {
        self.derivations.iter().map(|d| d.name())
    }

    /// Questions whose visibility condition holds, in declared order
    pub fn visible_questions(&self, answers: &AnswerContext) -> Vec<&Question> {
        self.questions.iter().filter(|q| q.is_visible(answers)).collect()
    }

    /// First visible question that has not been answered yet
    pub fn next_question(&self, answers: &AnswerContext) -> Option<&Question> {
        self.questions
            .iter()
            .find(|q| q.is_visible(answers) && answers.get(&q.id).is_none_or(Value::is_null))
    }

    /// Reject answers outside their question's options, unknown ids, and
    /// values supplied for derived variables
    pub fn validate_answers(&self, answers: &AnswerContext) -> Result<()> {
        let mut errors = Vec::new();
        for (id, value) in answers.iter() {
            if self.derived_names().any(|name| name == id) {
                errors.push(CapeError::validation(
                    CAPE0303,
                    format!("'{id}' is derived by the engine and cannot be answered"),
                    id,
                    Some(value.to_string()),
                ));
            } else if let Some(question) = self.question(id) {
                if !question.accepts(value) {
                    errors.push(CapeError::validation(
                        CAPE0301,
                        format!(
                            "'{}' is not one of the options for '{}' ({})",
                            value,
                            id,
                            question.options.join(", ")
                        ),
                        id,
                        Some(value.to_string()),
                    ));
                }
            } else if !self.variables.contains(id) {
                errors.push(CapeError::validation(
                    CAPE0302,
                    format!("'{id}' is neither a question nor a declared variable"),
                    id,
                    Some(value.to_string()),
                ));
            }
        }

        for err in &errors {
            log::warn!("rejected answer: {err}");
        }
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(CapeError::Multiple(errors)),
        }
    }

    /// Raw answers plus freshly computed derived variables
    pub fn derive(&self, answers: &AnswerContext) -> EnrichedContext {
        derive_variables(answers, &self.derivations, &self.coding)
    }

    /// Validate, derive, then return the first output rule whose predicate is true
    pub fn evaluate(&self, answers: &AnswerContext) -> Result<RuleOutcome> {
        self.validate_answers(answers)?;

        let enriched = self.derive(answers);
        let ctx = EvaluationContext::new(&self.namespace, &enriched);

        for rule in &self.outputs {
            let predicate = rule
                .predicate()
                .map_err(|e| EvalError::from(e).into_cape(&rule.id, &rule.when))?;
            let satisfied = self
                .evaluator
                .is_satisfied(predicate, &ctx)
                .map_err(|e| e.into_cape(&rule.id, &rule.when))?;
            if satisfied {
                log::debug!("[{}] output rule '{}' matched", self.tool_id, rule.id);
                return Ok(RuleOutcome::matched(rule, enriched.into_derived()));
            }
            log::trace!("[{}] output rule '{}' did not match", self.tool_id, rule.id);
        }

        log::warn!("[{}] no output rule matched", self.tool_id);
        Ok(RuleOutcome::no_match(enriched.into_derived()))
    }

    /// Static checks over every output predicate, for tooling
    ///
    /// Reports malformed predicates and undeclared names as errors, and
    /// comparisons against values a choice question can never take as warnings.
    pub fn check_predicates(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for rule in &self.outputs {
            let expr = match rule.predicate() {
                Ok(expr) => expr,
                Err(e) => {
                    let mut diag = Diagnostic::error(CAPE0202, e.to_string()).with_subject(&rule.id);
                    if let Some(loc) = e.location() {
                        diag = diag.with_location(loc.clone());
                    }
                    diagnostics.push(diag);
                    continue;
                }
            };

            for var in expr.variables() {
                if !self.namespace.contains(&var.name) {
                    diagnostics.push(
                        Diagnostic::error(CAPE0201, format!("undeclared variable '{}'", var.name))
                            .with_subject(&rule.id)
                            .with_location(SourceLocation::from_span(var.span, &rule.when)),
                    );
                }
            }

            self.check_option_literals(rule, expr, &mut diagnostics);
        }
        diagnostics
    }

    fn check_option_literals(&self, rule: &OutputRule, expr: &Spanned<Expression>, out: &mut Vec<Diagnostic>) {
        let question_of = |e: &Spanned<Expression>| match &e.inner {
            Expression::Variable(var) => self.question(&var.name),
            _ => None,
        };
        let literal_of = |e: &Spanned<Expression>| match &e.inner {
            Expression::Literal(lit) => Some(Spanned::new(lit.clone(), e.span)),
            _ => None,
        };

        match &expr.inner {
            Expression::Logical(l) => {
                for operand in &l.operands {
                    self.check_option_literals(rule, operand, out);
                }
            }
            Expression::BinaryOp(b) if matches!(b.op, BinaryOp::Equal | BinaryOp::NotEqual) => {
                if let (Some(q), Some(lit)) = (question_of(&b.left), literal_of(&b.right)) {
                    check_option(rule, q, &lit, out);
                } else if let (Some(q), Some(lit)) = (question_of(&b.right), literal_of(&b.left)) {
                    check_option(rule, q, &lit, out);
                }
            }
            Expression::Membership(m) => {
                if let Some(q) = question_of(&m.operand) {
                    for item in &m.items {
                        check_option(rule, q, item, out);
                    }
                }
            }
            Expression::UnaryOp(u) => self.check_option_literals(rule, &u.operand, out),
            _ => {}
        }
    }
}

fn check_option(rule: &OutputRule, question: &Question, lit: &Spanned<Literal>, out: &mut Vec<Diagnostic>) {
    let Literal::String(text) = &lit.inner else {
        return;
    };
    if !question.accepts(&Value::string(text)) {
        out.push(
            Diagnostic::warning(
                CAPE0301,
                format!("'{}' is never a valid answer for '{}'", text, question.id),
            )
            .with_subject(&rule.id)
            .with_location(SourceLocation::from_span(lit.span, &rule.when)),
        );
    }
}

fn build_questions(configs: Vec<QuestionConfig>, derived: &IndexSet<&str>) -> Result<Vec<Question>> {
    // First declaration position of every id, so a reference to a later
    // question can be told apart from a reference to no question at all
    let mut position: HashMap<String, usize> = HashMap::new();
    for (idx, cfg) in configs.iter().enumerate() {
        position.entry(cfg.id.clone()).or_insert(idx);
    }

    let mut questions: Vec<Question> = Vec::with_capacity(configs.len());
    for (idx, cfg) in configs.into_iter().enumerate() {
        if cfg.id.trim().is_empty() {
            return Err(CapeError::config(CAPE0102, format!("question #{} has an empty 'id'", idx + 1)));
        }
        if questions.iter().any(|q| q.id == cfg.id) {
            return Err(CapeError::config(CAPE0103, format!("duplicate question id '{}'", cfg.id)));
        }
        if derived.contains(cfg.id.as_str()) {
            return Err(CapeError::config(
                CAPE0108,
                format!("question id '{}' is reserved for a derived variable", cfg.id),
            ));
        }

        let mut seen = IndexSet::new();
        for opt in &cfg.options {
            if !seen.insert(opt.as_str()) {
                return Err(CapeError::config(
                    CAPE0109,
                    format!("question '{}' lists option '{}' twice", cfg.id, opt),
                ));
            }
        }

        let visible_if = cfg.visible_if.unwrap_or_default();
        for (dep, required) in &visible_if {
            match position.get(dep) {
                None => {
                    return Err(CapeError::config(
                        CAPE0105,
                        format!("question '{}' is conditioned on unknown question '{}'", cfg.id, dep),
                    ));
                }
                Some(&dep_idx) if dep_idx >= idx => {
                    return Err(CapeError::config(
                        CAPE0106,
                        format!(
                            "question '{}' is conditioned on '{}', which is not declared before it",
                            cfg.id, dep
                        ),
                    ));
                }
                Some(&dep_idx) => {
                    let prerequisite = &questions[dep_idx];
                    if !prerequisite.options.is_empty() && !prerequisite.options.contains(required) {
                        return Err(CapeError::config(
                            CAPE0107,
                            format!(
                                "question '{}' requires '{}' == '{}', which is not one of its options",
                                cfg.id, dep, required
                            ),
                        ));
                    }
                }
            }
        }

        questions.push(Question {
            id: cfg.id,
            text: cfg.text.trim().to_string(),
            kind: cfg.kind,
            options: cfg.options,
            visible_if,
        });
    }
    Ok(questions)
}

fn build_variables(
    names: Vec<String>,
    questions: &[Question],
    derived: &IndexSet<&str>,
) -> Result<IndexSet<String>> {
    let mut variables = IndexSet::new();
    for name in names {
        if derived.contains(name.as_str()) {
            return Err(CapeError::config(
                CAPE0108,
                format!("variable '{name}' is reserved for a derived variable"),
            ));
        }
        if questions.iter().any(|q| q.id == name) {
            return Err(CapeError::config(
                CAPE0110,
                format!("variable '{name}' is already declared as a question"),
            ));
        }
        if !variables.insert(name.clone()) {
            return Err(CapeError::config(CAPE0110, format!("variable '{name}' is declared twice")));
        }
    }
    Ok(variables)
}

fn build_outputs(configs: Vec<OutputConfig>) -> Result<Vec<OutputRule>> {
    let mut outputs: Vec<OutputRule> = Vec::with_capacity(configs.len());
    for (idx, cfg) in configs.into_iter().enumerate() {
        if cfg.id.trim().is_empty() {
            return Err(CapeError::config(CAPE0102, format!("output rule #{} has an empty 'id'", idx + 1)));
        }
        if outputs.iter().any(|o| o.id == cfg.id) {
            return Err(CapeError::config(CAPE0104, format!("duplicate output rule id '{}'", cfg.id)));
        }
        outputs.push(OutputRule::from_config(cfg));
    }
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
tool_id: t
questions:
  - id: a
    text: A?
    options: ["yes", "no"]
  - id: b
    text: B?
    options: ["yes", "no"]
    visible_if: { a: "yes" }
outputs:
  - id: first
    when: "a == 'yes'"
    recommendation_text: "  First.  "
    class: " I "
"#;

    #[test]
    fn test_texts_are_trimmed() {
        let engine = RuleEngine::from_yaml_str(MINIMAL).unwrap();
        let rule = &engine.outputs()[0];
        assert_eq!(rule.recommendation_text, "First.");
        assert_eq!(rule.classification, "I");
    }

    #[test]
    fn test_next_question() {
        let engine = RuleEngine::from_yaml_str(MINIMAL).unwrap();
        let mut answers = AnswerContext::new();
        assert_eq!(engine.next_question(&answers).map(|q| q.id.as_str()), Some("a"));
        answers.set("a", "yes");
        assert_eq!(engine.next_question(&answers).map(|q| q.id.as_str()), Some("b"));
        answers.set("b", "no");
        assert!(engine.next_question(&answers).is_none());
    }

    #[test]
    fn test_namespace_includes_derived() {
        let engine = RuleEngine::from_yaml_str(MINIMAL).unwrap();
        assert!(engine.namespace.contains("high_thrombotic_risk"));
        assert!(engine.namespace.contains("a"));
        assert!(!engine.namespace.contains("c"));
    }

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleEngine>();
    }
}
