use crate::cancel::CancellationToken;
use crate::classify::{Category, classify, exception_target};
use crate::error::{PolicyError, QueryError};
use crate::fingerprint::fingerprint_for_result;
use crate::model::Document;
use crate::policy::{Finding, Policy, QueryContext};
use crate::store::Store;
use confguard_types::{CheckResult, ResultSet, ids};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Rule name reported for failures of the exception query itself.
const EXCEPTION_QUERY: &str = "exception";

const SUCCESS: &str = "success";

/// One evaluation of a compiled policy against a set of documents.
///
/// The run owns its data [`Store`]; two runs never share mutable state.
pub struct TestRun<'p, P: Policy + ?Sized> {
    policy: &'p P,
    store: Store,
    cancel: CancellationToken,
}

impl<'p, P: Policy + ?Sized> TestRun<'p, P> {
    pub fn new(policy: &'p P, store: Store) -> Self {
        Self {
            policy,
            store,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Evaluate every document against every namespace.
    ///
    /// Pairs run strictly in sequence: document order first, namespace order within a
    /// document. Any query error aborts the run and no partial result set is returned.
    pub fn evaluate(
        &self,
        documents: &[Document],
        namespaces: &[String],
    ) -> Result<ResultSet, PolicyError> {
        let namespaces = effective_namespaces(namespaces);
        let mut results = ResultSet::default();

        for document in documents {
            for namespace in &namespaces {
                if self.cancel.is_cancelled() {
                    return Err(PolicyError::Cancelled);
                }
                let bucket = self.evaluate_pair(document, namespace)?;
                results.append(bucket);
            }
        }

        let counts = results.counts();
        info!(
            documents = documents.len(),
            namespaces = namespaces.len(),
            successes = counts.successes,
            failures = counts.failures,
            warnings = counts.warnings,
            exceptions = counts.exceptions,
            "policy evaluation finished"
        );

        Ok(results)
    }

    fn evaluate_pair(&self, document: &Document, namespace: &str) -> Result<ResultSet, PolicyError> {
        debug!(document = document.index(), namespace, "evaluating document");

        let ctx = QueryContext {
            namespace,
            document,
            store: &self.store,
            cancel: &self.cancel,
        };

        let exceptions = self
            .policy
            .exceptions(&ctx)
            .map_err(|e| query_failure(document, namespace, EXCEPTION_QUERY, e))?;

        let mut bucket = ResultSet::default();
        for rule in self.policy.rule_names(namespace) {
            let category = classify(&rule);
            if category == Category::Ignored {
                debug!(namespace, rule = %rule, "rule name matches no category; skipped");
                continue;
            }

            let findings = self
                .policy
                .query(&ctx, &rule)
                .map_err(|e| query_failure(document, namespace, &rule, e))?;

            if findings.is_empty() {
                bucket.successes.push(record(
                    SUCCESS,
                    document,
                    namespace,
                    &rule,
                    Finding::default(),
                ));
                continue;
            }

            for finding in findings {
                let result = record(category.as_str(), document, namespace, &rule, finding);
                match category {
                    Category::Warning => bucket.warnings.push(result),
                    _ => bucket.failures.push(result),
                }
            }
        }

        reconcile_exceptions(&mut bucket, &exceptions, document, namespace);
        Ok(bucket)
    }
}

/// Namespaces to query; an empty list means the default namespace only.
pub fn effective_namespaces(namespaces: &[String]) -> Vec<String> {
    if namespaces.is_empty() {
        vec![ids::DEFAULT_NAMESPACE.to_string()]
    } else {
        namespaces.to_vec()
    }
}

/// Move every record addressed by an exception entry into the exception list.
///
/// An entry addressing no evaluated rule is still reported, under the entry name.
fn reconcile_exceptions(
    bucket: &mut ResultSet,
    exceptions: &BTreeSet<String>,
    document: &Document,
    namespace: &str,
) {
    for entry in exceptions {
        let mut excepted: BTreeSet<String> = BTreeSet::new();
        for list in [
            &mut bucket.successes,
            &mut bucket.failures,
            &mut bucket.warnings,
        ] {
            list.retain(|r| {
                if exception_target(&r.rule) == entry.as_str() {
                    excepted.insert(r.rule.clone());
                    false
                } else {
                    true
                }
            });
        }

        if excepted.is_empty() {
            warn!(
                document = document.index(),
                namespace,
                exception = %entry,
                "exception does not address any evaluated rule"
            );
            excepted.insert(entry.clone());
        }

        for rule in excepted {
            bucket.exceptions.push(record(
                Category::Exception.as_str(),
                document,
                namespace,
                &rule,
                Finding::default(),
            ));
        }
    }
}

fn record(
    label: &str,
    document: &Document,
    namespace: &str,
    rule: &str,
    finding: Finding,
) -> CheckResult {
    let fingerprint = fingerprint_for_result(
        label,
        namespace,
        rule,
        &document.source,
        finding.message.as_deref(),
    );
    CheckResult {
        rule: rule.to_string(),
        namespace: namespace.to_string(),
        message: finding.message,
        document: document.source.clone(),
        metadata: finding.metadata,
        fingerprint: Some(fingerprint),
    }
}

fn query_failure(document: &Document, namespace: &str, rule: &str, err: QueryError) -> PolicyError {
    match err {
        QueryError::Cancelled => PolicyError::Cancelled,
        other => PolicyError::Evaluation {
            document: document.index(),
            namespace: namespace.to_string(),
            rule: rule.to_string(),
            source: other,
        },
    }
}
