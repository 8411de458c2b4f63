//! The seam between the aggregator and a rule-evaluation engine.
//!
//! An engine compiles rule sources into a [`Policy`]; the aggregator only lists rule names
//! and asks which of them fire for a document. Swapping the engine does not touch
//! classification or aggregation.

use crate::cancel::CancellationToken;
use crate::error::{PolicyError, QueryError};
use crate::model::Document;
use crate::store::Store;
use confguard_types::RepoPath;
use serde_json::Value;
use std::collections::BTreeSet;

/// One rule file handed to a compiler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicySource {
    pub path: RepoPath,
    pub text: String,
}

impl PolicySource {
    pub fn new(path: impl AsRef<str>, text: impl Into<String>) -> Self {
        Self {
            path: RepoPath::new(path),
            text: text.into(),
        }
    }
}

/// Output of a rule that fired against a document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Finding {
    pub message: Option<String>,
    pub metadata: Value,
}

impl Finding {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            metadata: Value::Null,
        }
    }
}

/// Everything a single query may look at.
#[derive(Clone, Copy, Debug)]
pub struct QueryContext<'a> {
    pub namespace: &'a str,
    pub document: &'a Document,
    pub store: &'a Store,
    pub cancel: &'a CancellationToken,
}

impl QueryContext<'_> {
    /// Fails with [`QueryError::Cancelled`] once the caller asked to stop.
    pub fn ensure_active(&self) -> Result<(), QueryError> {
        if self.cancel.is_cancelled() {
            return Err(QueryError::Cancelled);
        }
        Ok(())
    }
}

/// A compiled rule set.
pub trait Policy {
    /// All namespaces defining at least one rule or exception, sorted.
    fn namespaces(&self) -> Vec<String>;

    /// Rule names defined in `namespace`, sorted and unique.
    fn rule_names(&self, namespace: &str) -> Vec<String>;

    /// Findings produced by `rule` for the context document. Empty when the rule does not fire.
    fn query(&self, ctx: &QueryContext<'_>, rule: &str) -> Result<Vec<Finding>, QueryError>;

    /// Exception entries that apply to the context document.
    fn exceptions(&self, ctx: &QueryContext<'_>) -> Result<BTreeSet<String>, QueryError>;

    /// Rule names that fire for the context document.
    fn fired_rules(&self, ctx: &QueryContext<'_>) -> Result<BTreeSet<String>, QueryError> {
        let mut fired = BTreeSet::new();
        for rule in self.rule_names(ctx.namespace) {
            if !self.query(ctx, &rule)?.is_empty() {
                fired.insert(rule);
            }
        }
        Ok(fired)
    }
}

/// Builds a [`Policy`] from rule sources.
pub trait PolicyCompiler {
    type Policy: Policy;

    fn compile(&self, sources: &[PolicySource]) -> Result<Self::Policy, PolicyError>;
}

/// When a run counts as failed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailOn {
    #[default]
    Failure,
    Warning,
}
