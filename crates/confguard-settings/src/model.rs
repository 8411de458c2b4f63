use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `confguard.toml` schema v1.
///
/// Every key is optional; unset keys fall back to built-in defaults during resolution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConfguardConfigV1 {
    /// Optional schema string for tooling (`confguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Files or directories holding policy files. Default: `["policy"]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<Vec<String>>,

    /// Namespaces to evaluate. Default: `["main"]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespaces: Option<Vec<String>>,

    /// Evaluate every namespace the policy defines, ignoring `namespaces`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_namespaces: Option<bool>,

    /// Files or directories whose contents are exposed to rules under `data.<file stem>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<String>>,

    /// Regex excluding files during directory discovery. A trailing `/` matches
    /// directory names instead of file names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,

    /// Treat warnings as failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on_warn: Option<bool>,

    /// Evaluate all input documents as a single combined document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combine: Option<bool>,
}
