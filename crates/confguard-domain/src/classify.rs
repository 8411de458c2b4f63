//! Rule name classification.
//!
//! The rule engine has no severity field; the category of a rule is carried by its name.

use confguard_types::ids;
use regex::Regex;
use std::sync::LazyLock;

static WARN_QUERY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(&format!("^{}(_.+)?$", ids::RULE_WARN)).ok());
static FAIL_QUERY: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(&format!("^({}|{})(_.+)?$", ids::RULE_DENY, ids::RULE_VIOLATION)).ok()
});

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Warning,
    Failure,
    Exception,
    Ignored,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Warning => "warning",
            Category::Failure => "failure",
            Category::Exception => "exception",
            Category::Ignored => "ignored",
        }
    }
}

/// `warn`, or `warn_` followed by at least one character.
pub fn is_warning(name: &str) -> bool {
    WARN_QUERY.as_ref().is_some_and(|re| re.is_match(name))
}

/// `deny`/`violation`, or either followed by `_` and at least one character.
pub fn is_failure(name: &str) -> bool {
    FAIL_QUERY.as_ref().is_some_and(|re| re.is_match(name))
}

/// Category of a rule name as reported by the engine.
///
/// Exceptions are never named by a rule; they come from the engine's exception query,
/// so a rule name classifies as Warning, Failure or Ignored.
pub fn classify(name: &str) -> Category {
    if is_warning(name) {
        Category::Warning
    } else if is_failure(name) {
        Category::Failure
    } else {
        Category::Ignored
    }
}

/// Name under which exception entries address a rule: the severity prefix is removed.
///
/// `deny_run_as_root` -> `run_as_root`; bare `deny` stays `deny`.
pub fn exception_target(rule: &str) -> &str {
    ids::RULE_PREFIXES
        .iter()
        .find_map(|prefix| rule.strip_prefix(prefix).filter(|rest| !rest.is_empty()))
        .unwrap_or(rule)
}
