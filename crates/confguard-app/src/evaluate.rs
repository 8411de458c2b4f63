//! The `test` use case: evaluate documents against policies and produce a report.

use anyhow::Context;
use camino::Utf8Path;
use confguard_domain::report::compute_verdict;
use confguard_domain::{CancellationToken, Document, Policy, PolicyCompiler, TestRun};
use confguard_rules::RuleCompiler;
use confguard_settings::{ConfguardConfigV1, EffectiveConfig, Overrides};
use confguard_types::{
    ConfguardData, ConfguardReport, ReportEnvelope, SCHEMA_REPORT_V1, ToolMeta, Verdict,
};
use serde_json::{Value, json};
use time::OffsetDateTime;

use crate::inputs::{expand_inputs, policy_sources};

/// Input for the test use case.
#[derive(Clone, Debug)]
pub struct TestInput<'a> {
    /// Directory relative paths are resolved against.
    pub base: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
    /// Files or directories to evaluate.
    pub paths: Vec<String>,
    pub cancel: CancellationToken,
}

/// Output from the test use case.
#[derive(Clone, Debug)]
pub struct TestOutput {
    pub report: ConfguardReport,
    /// The resolved configuration used.
    pub config: EffectiveConfig,
}

/// Run the test use case: resolve config, load documents and policies, evaluate, report.
pub fn run_test(input: TestInput<'_>) -> anyhow::Result<TestOutput> {
    let started_at = OffsetDateTime::now_utc();

    let cfg = if input.config_text.trim().is_empty() {
        ConfguardConfigV1::default()
    } else {
        confguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let config =
        confguard_settings::resolve_config(cfg, input.overrides).context("resolve config")?;

    if input.paths.is_empty() {
        anyhow::bail!("no input paths given");
    }

    let files = expand_inputs(input.base, &input.paths, &config.exclude)?;
    let mut documents =
        confguard_repo::load_documents(input.base, &files).context("load documents")?;
    if config.combine {
        documents = vec![combine(documents)];
    }

    let sources = policy_sources(input.base, &config.policy)?;
    let policy = RuleCompiler.compile(&sources).context("compile policies")?;

    let data_files = expand_inputs(input.base, &config.data, "").context("expand data paths")?;
    let store = confguard_repo::load_store(input.base, &data_files).context("load data")?;

    let namespaces = if config.all_namespaces {
        policy.namespaces()
    } else {
        config.namespaces.clone()
    };

    tracing::info!(
        files = files.len(),
        documents = documents.len(),
        policies = sources.len(),
        namespaces = ?namespaces,
        "running policy tests"
    );

    let results = TestRun::new(&policy, store)
        .with_cancellation(input.cancel)
        .evaluate(&documents, &namespaces)
        .context("evaluate policies")?;

    let verdict = compute_verdict(&results, config.fail_on);
    let data = ConfguardData {
        namespaces,
        files_scanned: files.len() as u32,
        documents_evaluated: documents.len() as u32,
        policies_loaded: sources.len() as u32,
        combined: config.combine,
        counts: results.counts(),
    };

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "confguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict,
        results,
        data,
    };

    Ok(TestOutput { report, config })
}

/// Fold every document into one array of `{ path, contents }` entries.
fn combine(documents: Vec<Document>) -> Document {
    let entries: Vec<Value> = documents
        .into_iter()
        .map(|doc| {
            json!({
                "path": doc.path().map(|p| p.as_str().to_string()),
                "contents": doc.content,
            })
        })
        .collect();
    Document::new(0, None, Value::Array(entries))
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}
