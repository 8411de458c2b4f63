use crate::{RuleCompiler, compile_str};
use confguard_domain::{
    CancellationToken, Document, Policy, PolicyCompiler, PolicyError, PolicySource, QueryContext,
    Store, TestRun,
};
use serde_json::{Value, json};

const RUN_AS_ROOT: &str = r#"
[[rule]]
name = "deny_run_as_root"
message = "Containers must not run as root"
when = [
  { path = "kind", equals = "Deployment" },
  { path = "spec.template.spec.securityContext.runAsNonRoot", not_equals = true },
]

[[exception]]
rules = ["run_as_root"]
when = [{ path = "metadata.name", equals = "can-run-as-root" }]
"#;

const KUBERNETES: &str = r#"
package = "main"

[[rule]]
name = "deny"
message = "Containers must not run as root"
when = [
  { path = "kind", equals = "Deployment" },
  { path = "spec.template.spec.securityContext.runAsNonRoot", not_equals = true },
]

[[rule]]
name = "deny"
message = "Containers must provide app label for pod selectors"
when = [
  { path = "kind", equals = "Deployment" },
  { path = "spec.selector.matchLabels.app", exists = false },
]

[[rule]]
name = "warn_latest"
message = "Image uses the latest tag"
when = [{ path = "spec.template.spec.containers[*].image", matches = ":latest$" }]

[[rule]]
name = "helper"
when = []
"#;

fn deployment(name: &str) -> Value {
    json!({
        "kind": "Deployment",
        "metadata": { "name": name },
        "spec": { "template": { "spec": { "containers": [{ "image": "nginx:1.25" }] } } }
    })
}

fn documents(values: Vec<Value>) -> Vec<Document> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| Document::new(i as u32, None, v))
        .collect()
}

fn main_ns() -> Vec<String> {
    vec!["main".to_string()]
}

#[test]
fn exception_scenario_end_to_end() {
    let policy = compile_str("policy/exception.toml", RUN_AS_ROOT).expect("compile");
    let docs = documents(vec![
        deployment("cannot-run-as-root"),
        deployment("can-run-as-root"),
    ]);

    let results = TestRun::new(&policy, Store::new())
        .evaluate(&docs, &main_ns())
        .expect("evaluate");

    assert_eq!(results.failures.len(), 1);
    assert_eq!(results.successes.len(), 0);
    assert_eq!(results.exceptions.len(), 1);
    assert_eq!(results.failures[0].document.index, 0);
    assert_eq!(results.exceptions[0].rule, "deny_run_as_root");
    assert_eq!(results.exceptions[0].document.index, 1);
}

#[test]
fn deployment_and_service_scenario() {
    let policy = compile_str("policy/kubernetes.toml", KUBERNETES).expect("compile");
    let docs = documents(vec![
        json!({
            "kind": "Service",
            "metadata": { "name": "hello-kubernetes" },
            "spec": { "type": "LoadBalancer" }
        }),
        json!({
            "kind": "Deployment",
            "metadata": { "name": "hello-kubernetes" },
            "spec": {
                "selector": { "matchLabels": { "app": "hello" } },
                "template": { "spec": { "containers": [{ "image": "hello:1.5" }] } }
            }
        }),
    ]);

    let results = TestRun::new(&policy, Store::new())
        .evaluate(&docs, &main_ns())
        .expect("evaluate");

    // Service: deny and warn_latest both pass. Deployment: deny fires once (root), warn passes.
    assert_eq!(results.failures.len(), 1);
    assert_eq!(
        results.failures[0].message.as_deref(),
        Some("Containers must not run as root")
    );
    assert_eq!(results.successes.len(), 3);
    assert!(results.warnings.is_empty());
    assert!(results.successes.iter().all(|r| r.rule != "helper"));
}

#[test]
fn incremental_definitions_each_produce_a_finding() {
    let policy = compile_str("k8s.toml", KUBERNETES).expect("compile");
    let docs = documents(vec![json!({
        "kind": "Deployment",
        "spec": { "template": { "spec": { "containers": [{ "image": "nginx:latest" }] } } }
    })]);

    let results = TestRun::new(&policy, Store::new())
        .evaluate(&docs, &main_ns())
        .expect("evaluate");

    assert_eq!(results.failures.len(), 2);
    assert_eq!(results.warnings.len(), 1);
    assert_eq!(results.warnings[0].rule, "warn_latest");
}

#[test]
fn rules_can_consult_the_data_store() {
    let text = r#"
[[rule]]
name = "deny_unapproved_registry"
message = "registry is not approved"
when = [{ path = "registry", not_equals = "internal" }]

[[rule]]
name = "warn_listed"
message = "image is on the watch list"
when = [{ path = "data.watch.images[*]", equals = "nginx" }]
"#;
    let policy = compile_str("store.toml", text).expect("compile");
    let mut store = Store::new();
    store.insert("watch", json!({ "images": ["nginx", "redis"] }));
    let docs = documents(vec![json!({ "registry": "internal" })]);

    let results = TestRun::new(&policy, store)
        .evaluate(&docs, &main_ns())
        .expect("evaluate");

    assert_eq!(results.successes.len(), 1);
    assert_eq!(results.warnings.len(), 1);
}

#[test]
fn namespaces_merge_across_files() {
    let sources = [
        PolicySource::new("a.toml", "package = \"k8s\"\n[[rule]]\nname = \"deny\"\n"),
        PolicySource::new("b.toml", "[[rule]]\nname = \"warn\"\n"),
        PolicySource::new("c.toml", "package = \"k8s\"\n[[rule]]\nname = \"violation_x\"\n"),
    ];
    let policy = RuleCompiler.compile(&sources).expect("compile");

    assert_eq!(policy.namespaces(), vec!["k8s", "main"]);
    assert_eq!(policy.rule_names("k8s"), vec!["deny", "violation_x"]);
    assert!(policy.rule_names("docker").is_empty());
    assert_eq!(policy.sources().len(), 3);
    assert_eq!(policy.rule_count(), 3);
}

#[test]
fn compile_errors_name_the_file() {
    let cases = [
        ("broken.toml", "[[rule]\nname = 1"),
        ("unknown.toml", "[[rule]]\nname = \"deny\"\nseverity = \"high\"\n"),
        ("blank.toml", "[[rule]]\nname = \"\"\n"),
        ("space.toml", "[[rule]]\nname = \"deny me\"\n"),
        ("empty_exc.toml", "[[exception]]\nrules = []\n"),
        (
            "cond.toml",
            "[[rule]]\nname = \"deny\"\nwhen = [{ path = \"a\", matches = \"(\" }]\n",
        ),
    ];
    for (path, text) in cases {
        match compile_str(path, text) {
            Err(PolicyError::Compilation { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("{path}: expected compilation error, got {other:?}"),
        }
    }
}

#[test]
fn querying_an_undefined_rule_is_an_engine_error() {
    let policy = compile_str("p.toml", "[[rule]]\nname = \"deny\"\n").expect("compile");
    let doc = Document::new(0, None, json!({}));
    let store = Store::new();
    let cancel = CancellationToken::new();
    let ctx = QueryContext {
        namespace: "main",
        document: &doc,
        store: &store,
        cancel: &cancel,
    };

    assert!(policy.query(&ctx, "deny_missing").is_err());
    assert_eq!(policy.query(&ctx, "deny").expect("query").len(), 1);
    assert_eq!(
        policy.fired_rules(&ctx).expect("fired").into_iter().collect::<Vec<_>>(),
        vec!["deny".to_string()]
    );
}

#[test]
fn cancelled_run_stops_with_cancellation() {
    let policy = compile_str("exception.toml", RUN_AS_ROOT).expect("compile");
    let cancel = CancellationToken::new();
    cancel.cancel();
    let docs = documents(vec![deployment("x")]);

    let err = TestRun::new(&policy, Store::new())
        .with_cancellation(cancel)
        .evaluate(&docs, &main_ns())
        .unwrap_err();
    assert!(matches!(err, PolicyError::Cancelled));
}
