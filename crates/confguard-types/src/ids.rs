//! Stable identifiers shared by the engine, the settings layer and the CLI.
//!
//! Rule names are classified by prefix; these are the prefixes and literals recognized.

/// Namespace queried when the caller does not name any.
pub const DEFAULT_NAMESPACE: &str = "main";

// Rule name literals
pub const RULE_WARN: &str = "warn";
pub const RULE_DENY: &str = "deny";
pub const RULE_VIOLATION: &str = "violation";

/// Prefixes stripped from a rule name when matching it against exception entries.
pub const RULE_PREFIXES: &[&str] = &["deny_", "violation_", "warn_"];

// Config
pub const DEFAULT_CONFIG_FILE: &str = "confguard.toml";
pub const DEFAULT_POLICY_DIR: &str = "policy";
