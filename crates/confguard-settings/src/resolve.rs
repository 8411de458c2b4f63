use crate::model::ConfguardConfigV1;
use anyhow::Context;
use confguard_domain::policy::FailOn;
use confguard_types::ids;

/// Command-line values that take precedence over the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub policy: Option<Vec<String>>,
    pub namespaces: Option<Vec<String>>,
    pub all_namespaces: Option<bool>,
    pub data: Option<Vec<String>>,
    pub exclude: Option<String>,
    pub fail_on_warn: Option<bool>,
    pub combine: Option<bool>,
}

/// Fully resolved settings for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub policy: Vec<String>,
    pub namespaces: Vec<String>,
    pub all_namespaces: bool,
    pub data: Vec<String>,
    pub exclude: String,
    pub fail_on: FailOn,
    pub combine: bool,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            policy: vec![ids::DEFAULT_POLICY_DIR.to_string()],
            namespaces: vec![ids::DEFAULT_NAMESPACE.to_string()],
            all_namespaces: false,
            data: Vec::new(),
            exclude: String::new(),
            fail_on: FailOn::Failure,
            combine: false,
        }
    }
}

pub fn resolve_config(
    cfg: ConfguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<EffectiveConfig> {
    let defaults = EffectiveConfig::default();

    let policy = non_empty(overrides.policy)
        .or(non_empty(cfg.policy))
        .unwrap_or(defaults.policy);

    let namespaces = non_empty(overrides.namespaces)
        .or(non_empty(cfg.namespaces))
        .unwrap_or(defaults.namespaces);
    for ns in &namespaces {
        validate_namespace(ns)?;
    }

    let exclude = overrides
        .exclude
        .or(cfg.exclude)
        .unwrap_or(defaults.exclude);
    let body = exclude.strip_suffix('/').unwrap_or(&exclude);
    regex::Regex::new(body).with_context(|| format!("invalid exclude pattern '{exclude}'"))?;

    let fail_on_warn = overrides
        .fail_on_warn
        .or(cfg.fail_on_warn)
        .unwrap_or(false);

    Ok(EffectiveConfig {
        policy,
        namespaces,
        all_namespaces: overrides
            .all_namespaces
            .or(cfg.all_namespaces)
            .unwrap_or(defaults.all_namespaces),
        data: non_empty(overrides.data)
            .or(non_empty(cfg.data))
            .unwrap_or(defaults.data),
        exclude,
        fail_on: if fail_on_warn {
            FailOn::Warning
        } else {
            FailOn::Failure
        },
        combine: overrides
            .combine
            .or(cfg.combine)
            .unwrap_or(defaults.combine),
    })
}

fn non_empty(v: Option<Vec<String>>) -> Option<Vec<String>> {
    v.filter(|v| !v.is_empty())
}

fn validate_namespace(ns: &str) -> anyhow::Result<()> {
    if ns.trim().is_empty() {
        anyhow::bail!("namespace must not be empty");
    }
    if ns.chars().any(char::is_whitespace) {
        anyhow::bail!("invalid namespace '{ns}': must not contain whitespace");
    }
    Ok(())
}
