use crate::parse::ConditionDef;
use crate::selector::Selector;
use regex::Regex;
use serde_json::Value;

#[derive(Clone, Debug)]
enum Predicate {
    Equals(Value),
    NotEquals(Value),
    Exists(bool),
    Matches(Regex),
    OneOf(Vec<Value>),
}

/// One compiled `when` entry.
#[derive(Clone, Debug)]
pub struct Condition {
    selector: Selector,
    predicate: Predicate,
}

impl Condition {
    pub fn compile(def: &ConditionDef) -> Result<Self, String> {
        let selector = Selector::parse(&def.path)?;

        let mut predicates = Vec::new();
        if let Some(v) = &def.equals {
            predicates.push(Predicate::Equals(v.clone()));
        }
        if let Some(v) = &def.not_equals {
            predicates.push(Predicate::NotEquals(v.clone()));
        }
        if let Some(v) = def.exists {
            predicates.push(Predicate::Exists(v));
        }
        if let Some(pattern) = &def.matches {
            let re = Regex::new(pattern)
                .map_err(|e| format!("invalid regex '{pattern}' for '{selector}': {e}"))?;
            predicates.push(Predicate::Matches(re));
        }
        if let Some(v) = &def.one_of {
            predicates.push(Predicate::OneOf(v.clone()));
        }

        if predicates.len() != 1 {
            return Err(format!(
                "condition on '{selector}' needs exactly one of equals, not_equals, exists, matches, one_of (found {})",
                predicates.len()
            ));
        }
        let predicate = predicates.remove(0);

        Ok(Self {
            selector,
            predicate,
        })
    }

    pub fn holds(&self, input: &Value, data: &Value) -> bool {
        let selected = self.selector.select(input, data);
        match &self.predicate {
            Predicate::Equals(expected) => selected.iter().any(|v| *v == expected),
            Predicate::NotEquals(expected) => !selected.iter().any(|v| *v == expected),
            Predicate::Exists(wanted) => selected.iter().any(|v| !v.is_null()) == *wanted,
            Predicate::Matches(re) => selected
                .iter()
                .filter_map(|v| v.as_str())
                .any(|s| re.is_match(s)),
            Predicate::OneOf(options) => selected.iter().any(|v| options.contains(*v)),
        }
    }
}
