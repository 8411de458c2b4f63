use crate::condition::Condition;
use confguard_domain::{Finding, Policy, QueryContext, QueryError};
use confguard_types::RepoPath;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// One definition of a rule. Several definitions may share a name.
#[derive(Clone, Debug)]
pub(crate) struct CompiledRule {
    pub message: Option<String>,
    pub metadata: Value,
    pub when: Vec<Condition>,
    pub origin: RepoPath,
}

#[derive(Clone, Debug)]
pub(crate) struct CompiledException {
    pub rules: Vec<String>,
    pub when: Vec<Condition>,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Package {
    pub rules: BTreeMap<String, Vec<CompiledRule>>,
    pub exceptions: Vec<CompiledException>,
}

/// Rule files compiled into per-namespace rule tables.
#[derive(Clone, Debug, Default)]
pub struct CompiledRules {
    pub(crate) packages: BTreeMap<String, Package>,
    pub(crate) sources: Vec<RepoPath>,
}

impl CompiledRules {
    /// Files the rules were compiled from, in compilation order.
    pub fn sources(&self) -> &[RepoPath] {
        &self.sources
    }

    pub fn rule_count(&self) -> usize {
        self.packages
            .values()
            .flat_map(|p| p.rules.values())
            .map(Vec::len)
            .sum()
    }
}

fn all_hold(conditions: &[Condition], input: &Value, data: &Value) -> bool {
    conditions.iter().all(|c| c.holds(input, data))
}

impl Policy for CompiledRules {
    fn namespaces(&self) -> Vec<String> {
        self.packages.keys().cloned().collect()
    }

    fn rule_names(&self, namespace: &str) -> Vec<String> {
        self.packages
            .get(namespace)
            .map(|p| p.rules.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn query(&self, ctx: &QueryContext<'_>, rule: &str) -> Result<Vec<Finding>, QueryError> {
        ctx.ensure_active()?;

        let definitions = self
            .packages
            .get(ctx.namespace)
            .and_then(|p| p.rules.get(rule))
            .ok_or_else(|| QueryError::Engine(format!("undefined rule {}.{rule}", ctx.namespace)))?;

        let input = &ctx.document.content;
        let data = ctx.store.root();
        let findings = definitions
            .iter()
            .filter(|def| all_hold(&def.when, input, data))
            .map(|def| {
                tracing::trace!(rule, origin = %def.origin, "rule fired");
                Finding {
                    message: def.message.clone(),
                    metadata: def.metadata.clone(),
                }
            })
            .collect();
        Ok(findings)
    }

    fn exceptions(&self, ctx: &QueryContext<'_>) -> Result<BTreeSet<String>, QueryError> {
        ctx.ensure_active()?;

        let Some(package) = self.packages.get(ctx.namespace) else {
            return Ok(BTreeSet::new());
        };
        let input = &ctx.document.content;
        let data = ctx.store.root();
        Ok(package
            .exceptions
            .iter()
            .filter(|e| all_hold(&e.when, input, data))
            .flat_map(|e| e.rules.iter().cloned())
            .collect())
    }
}
