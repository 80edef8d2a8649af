//! Answer and evaluation contexts

use crate::Value;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Answers collected for one evaluation session, keyed by question or variable id
///
/// Entries can be added or overwritten but never removed. Insertion order is
/// preserved so reports list answers in the order they were given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerContext {
    answers: IndexMap<String, Value>,
}

impl AnswerContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer, replacing any previous answer for the same id
    pub fn set(&mut self, id: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.answers.insert(id.into(), value.into());
        self
    }

    /// Builder form of [`AnswerContext::set`]
    pub fn with(mut self, id: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(id, value);
        self
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.answers.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.answers.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.answers.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for AnswerContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ctx = Self::new();
        for (k, v) in iter {
            ctx.set(k, v);
        }
        ctx
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for AnswerContext {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

/// Raw answers plus the derived variables computed from them
///
/// Produced fresh for every evaluation; the caller's [`AnswerContext`] is
/// never modified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedContext {
    raw: AnswerContext,
    derived: IndexMap<String, Value>,
}

impl EnrichedContext {
    pub(crate) fn new(raw: AnswerContext, derived: IndexMap<String, Value>) -> Self {
        Self { raw, derived }
    }

    /// Look a name up, derived variables first
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.derived.get(name).or_else(|| self.raw.get(name))
    }

    pub fn raw(&self) -> &AnswerContext {
        &self.raw
    }

    pub fn derived(&self) -> &IndexMap<String, Value> {
        &self.derived
    }

    pub fn into_derived(self) -> IndexMap<String, Value> {
        self.derived
    }
}

/// The closed set of names a predicate may reference
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    names: IndexSet<String>,
}

impl Namespace {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Everything a predicate evaluation reads: the declared namespace and the values
pub struct EvaluationContext<'a> {
    pub namespace: &'a Namespace,
    pub values: &'a EnrichedContext,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(namespace: &'a Namespace, values: &'a EnrichedContext) -> Self {
        Self { namespace, values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites_in_place() {
        let mut ctx = AnswerContext::new();
        ctx.set("a", "yes").set("b", "no").set("a", "no");
        let entries: Vec<_> = ctx.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        assert_eq!(
            entries,
            vec![
                ("a".to_string(), Value::string("no")),
                ("b".to_string(), Value::string("no")),
            ]
        );
    }

    #[test]
    fn test_lookup_covers_raw_and_derived() {
        let raw = AnswerContext::new().with("x", "yes");
        let mut derived = IndexMap::new();
        derived.insert("d".to_string(), Value::string("no"));
        let enriched = EnrichedContext::new(raw.clone(), derived);
        assert_eq!(enriched.lookup("x"), Some(&Value::string("yes")));
        assert_eq!(enriched.lookup("d"), Some(&Value::string("no")));
        assert_eq!(enriched.raw(), &raw);
    }

    #[test]
    fn test_deserialize_preserves_order() {
        let ctx: AnswerContext = serde_json::from_str(r#"{"z": "yes", "a": 1}"#).unwrap();
        let keys: Vec<_> = ctx.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a"]);
    }
}
