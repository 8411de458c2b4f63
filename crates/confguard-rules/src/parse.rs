use serde::Deserialize;
use serde_json::Value;

/// On-disk shape of one rule file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleFile {
    #[serde(default)]
    pub package: Option<String>,

    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleDef>,

    #[serde(default, rename = "exception")]
    pub exceptions: Vec<ExceptionDef>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDef {
    pub name: String,

    #[serde(default)]
    pub message: Option<String>,

    /// Copied verbatim into every finding of the rule.
    #[serde(default)]
    pub metadata: Option<Value>,

    #[serde(default)]
    pub when: Vec<ConditionDef>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExceptionDef {
    /// Rule names without their severity prefix (`run_as_root` for `deny_run_as_root`).
    pub rules: Vec<String>,

    #[serde(default)]
    pub when: Vec<ConditionDef>,
}

/// A selector plus exactly one operator.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionDef {
    pub path: String,

    #[serde(default)]
    pub equals: Option<Value>,

    #[serde(default)]
    pub not_equals: Option<Value>,

    #[serde(default)]
    pub exists: Option<bool>,

    #[serde(default)]
    pub matches: Option<String>,

    #[serde(default)]
    pub one_of: Option<Vec<Value>>,
}

pub fn parse_rule_file(text: &str) -> Result<RuleFile, toml::de::Error> {
    toml::from_str(text)
}
