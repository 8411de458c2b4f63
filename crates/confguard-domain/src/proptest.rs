//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Rule name classification (total, exclusive, anchored)
//! - Result ordering across documents and namespaces
//! - Determinism of repeated evaluation

use crate::classify::{Category, classify, exception_target, is_failure, is_warning};
use crate::policy::Finding;
use crate::run::TestRun;
use crate::store::Store;
use crate::test_support::{StaticPolicy, document};
use proptest::prelude::*;
use serde_json::json;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

/// Rule-name-like strings without line breaks (rule names never span lines).
fn arb_rule_name() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[a-zA-Z0-9_]{0,16}").unwrap(),
        prop::string::string_regex("(warn|deny|violation)[a-zA-Z0-9_]{0,8}").unwrap(),
        prop::string::string_regex("(warn|deny|violation)_[a-zA-Z0-9_ .-]{0,8}").unwrap(),
    ]
}

/// Non-empty suffix allowed after a severity prefix.
fn arb_suffix() -> impl Strategy<Value = String> {
    prop::string::string_regex("[^\n]{1,12}").unwrap()
}

fn arb_namespaces() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(vec!["main", "k8s", "docker"]), 1..4)
        .prop_map(|v| v.into_iter().map(str::to_string).collect())
}

// ============================================================================
// Classification
// ============================================================================

proptest! {
    #[test]
    fn classification_is_exclusive(name in arb_rule_name()) {
        prop_assert!(!(is_warning(&name) && is_failure(&name)));
    }

    #[test]
    fn classify_agrees_with_predicates(name in arb_rule_name()) {
        let expected = if is_warning(&name) {
            Category::Warning
        } else if is_failure(&name) {
            Category::Failure
        } else {
            Category::Ignored
        };
        prop_assert_eq!(classify(&name), expected);
    }

    #[test]
    fn warning_matches_reference_definition(name in arb_rule_name()) {
        let reference = name == "warn"
            || name.strip_prefix("warn_").is_some_and(|rest| !rest.is_empty());
        prop_assert_eq!(is_warning(&name), reference);
    }

    #[test]
    fn failure_matches_reference_definition(name in arb_rule_name()) {
        let reference = name == "deny"
            || name == "violation"
            || ["deny_", "violation_"]
                .iter()
                .any(|p| name.strip_prefix(p).is_some_and(|rest| !rest.is_empty()));
        prop_assert_eq!(is_failure(&name), reference);
    }

    #[test]
    fn any_suffix_after_prefix_classifies(suffix in arb_suffix()) {
        let warn = format!("warn_{suffix}");
        let deny = format!("deny_{suffix}");
        let violation = format!("violation_{suffix}");
        prop_assert!(is_warning(&warn));
        prop_assert!(is_failure(&deny));
        prop_assert!(is_failure(&violation));
    }

    #[test]
    fn exception_target_strips_the_prefix(suffix in arb_suffix()) {
        let deny = format!("deny_{suffix}");
        let warn = format!("warn_{suffix}");
        prop_assert_eq!(exception_target(&deny), suffix.as_str());
        prop_assert_eq!(exception_target(&warn), suffix.as_str());
    }
}

// ============================================================================
// Aggregation
// ============================================================================

proptest! {
    #[test]
    fn results_are_ordered_by_document_then_namespace(
        doc_count in 1usize..6,
        namespaces in arb_namespaces(),
    ) {
        let policy = StaticPolicy::new()
            .rule("main", "deny", |_| vec![Finding::message("main")])
            .rule("k8s", "deny", |_| vec![Finding::message("k8s")])
            .rule("docker", "deny", |_| vec![Finding::message("docker")]);
        let docs: Vec<_> = (0..doc_count as u32)
            .map(|i| document(i, json!({ "i": i })))
            .collect();

        let results = TestRun::new(&policy, Store::new())
            .evaluate(&docs, &namespaces)
            .expect("evaluate");

        let actual: Vec<(u32, String)> = results
            .failures
            .iter()
            .map(|r| (r.document.index, r.namespace.clone()))
            .collect();
        let expected: Vec<(u32, String)> = (0..doc_count as u32)
            .flat_map(|i| namespaces.iter().map(move |ns| (i, ns.clone())))
            .collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn evaluation_is_deterministic(flags in prop::collection::vec(any::<bool>(), 1..8)) {
        let policy = StaticPolicy::new()
            .rule("main", "deny", |ctx| {
                if ctx.document.content["bad"] == json!(true) {
                    vec![Finding::message("bad")]
                } else {
                    Vec::new()
                }
            })
            .exception("main", |ctx| {
                if ctx.document.index() % 3 == 0 { vec!["deny"] } else { Vec::new() }
            });
        let docs: Vec<_> = flags
            .iter()
            .enumerate()
            .map(|(i, bad)| document(i as u32, json!({ "bad": bad })))
            .collect();
        let run = TestRun::new(&policy, Store::new());

        let first = run.evaluate(&docs, &[]).expect("first");
        let second = run.evaluate(&docs, &[]).expect("second");
        prop_assert_eq!(&first, &second);

        let counts = first.counts();
        prop_assert_eq!(
            (counts.successes + counts.failures + counts.exceptions) as usize,
            docs.len()
        );
    }
}
