//! Shared helpers for rule engine tests

#![allow(dead_code)]

use cape_rules::{AnswerContext, RuleEngine};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn engine(yaml: &str) -> RuleEngine {
    init_logging();
    RuleEngine::from_yaml_str(yaml).unwrap_or_else(|e| panic!("rule set failed to load: {e:?}"))
}

pub fn dapt() -> RuleEngine {
    init_logging();
    RuleEngine::bundled_dapt().unwrap_or_else(|e| panic!("bundled rule set failed to load: {e:?}"))
}

pub fn answers(pairs: &[(&str, &str)]) -> AnswerContext {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

pub fn yn(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}
