use crate::error::QueryError;
use crate::model::Document;
use crate::policy::{Finding, Policy, QueryContext};
use serde_json::Value;
use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};

pub type RuleFn = fn(&QueryContext<'_>) -> Vec<Finding>;
pub type ExceptionFn = fn(&QueryContext<'_>) -> Vec<&'static str>;

/// In-memory policy for driving `TestRun` without a real rule engine.
#[derive(Default)]
pub struct StaticPolicy {
    rules: BTreeMap<String, Vec<(String, RuleFn)>>,
    exceptions: BTreeMap<String, Vec<ExceptionFn>>,
    failing_rule: Option<String>,
    queries: Cell<usize>,
}

impl StaticPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule body; repeated names are incremental definitions of one rule.
    pub fn rule(mut self, namespace: &str, name: &str, body: RuleFn) -> Self {
        self.rules
            .entry(namespace.to_string())
            .or_default()
            .push((name.to_string(), body));
        self
    }

    pub fn exception(mut self, namespace: &str, body: ExceptionFn) -> Self {
        self.exceptions
            .entry(namespace.to_string())
            .or_default()
            .push(body);
        self
    }

    /// Make every query of `rule` fail with an engine error.
    pub fn failing(mut self, rule: &str) -> Self {
        self.failing_rule = Some(rule.to_string());
        self
    }

    pub fn queries(&self) -> usize {
        self.queries.get()
    }
}

impl Policy for StaticPolicy {
    fn namespaces(&self) -> Vec<String> {
        let mut all: BTreeSet<String> = self.rules.keys().cloned().collect();
        all.extend(self.exceptions.keys().cloned());
        all.into_iter().collect()
    }

    fn rule_names(&self, namespace: &str) -> Vec<String> {
        let names: BTreeSet<String> = self
            .rules
            .get(namespace)
            .map(|defs| defs.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default();
        names.into_iter().collect()
    }

    fn query(&self, ctx: &QueryContext<'_>, rule: &str) -> Result<Vec<Finding>, QueryError> {
        ctx.ensure_active()?;
        self.queries.set(self.queries.get() + 1);
        if self.failing_rule.as_deref() == Some(rule) {
            return Err(QueryError::Engine(format!("rule {rule} is broken")));
        }
        let mut out = Vec::new();
        for (name, body) in self.rules.get(ctx.namespace).into_iter().flatten() {
            if name == rule {
                out.extend(body(ctx));
            }
        }
        Ok(out)
    }

    fn exceptions(&self, ctx: &QueryContext<'_>) -> Result<BTreeSet<String>, QueryError> {
        ctx.ensure_active()?;
        let mut out = BTreeSet::new();
        for body in self.exceptions.get(ctx.namespace).into_iter().flatten() {
            out.extend(body(ctx).into_iter().map(str::to_string));
        }
        Ok(out)
    }
}

pub fn document(index: u32, content: Value) -> Document {
    Document::new(index, None, content)
}

pub fn kind<'a>(ctx: &QueryContext<'a>) -> Option<&'a str> {
    ctx.document.content.get("kind").and_then(Value::as_str)
}

pub fn name<'a>(ctx: &QueryContext<'a>) -> Option<&'a str> {
    ctx.document
        .content
        .pointer("/metadata/name")
        .and_then(Value::as_str)
}

pub fn namespaces(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
