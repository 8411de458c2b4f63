use serde_json::Value;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Root {
    Input,
    Data,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Step {
    Key(String),
    Index(usize),
    Each,
}

/// Dotted path into a document (`spec.containers[*].image`) or, with a `data.`
/// prefix, into the run's data store.
///
/// `[N]` picks one array element, `[*]` fans out over all of them. A leading `input.`
/// is accepted and ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    text: String,
    root: Root,
    steps: Vec<Step>,
}

impl Selector {
    pub fn parse(text: &str) -> Result<Self, String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err("empty selector".to_string());
        }

        let mut segments: Vec<&str> = trimmed.split('.').collect();
        let root = match segments.first().copied() {
            Some("data") => {
                segments.remove(0);
                Root::Data
            }
            Some("input") => {
                segments.remove(0);
                Root::Input
            }
            _ => Root::Input,
        };

        let mut steps = Vec::new();
        for segment in segments {
            parse_segment(segment, &mut steps)
                .map_err(|reason| format!("invalid selector '{trimmed}': {reason}"))?;
        }

        Ok(Self {
            text: trimmed.to_string(),
            root,
            steps,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Every value the selector reaches. Missing keys and out-of-range indexes
    /// select nothing.
    pub fn select<'v>(&self, input: &'v Value, data: &'v Value) -> Vec<&'v Value> {
        let start = match self.root {
            Root::Input => input,
            Root::Data => data,
        };

        let mut current = vec![start];
        for step in &self.steps {
            let mut next = Vec::new();
            for value in current {
                match step {
                    Step::Key(key) => next.extend(value.get(key.as_str())),
                    Step::Index(i) => next.extend(value.as_array().and_then(|a| a.get(*i))),
                    Step::Each => next.extend(value.as_array().into_iter().flatten()),
                }
            }
            if next.is_empty() {
                return next;
            }
            current = next;
        }
        current
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn parse_segment(segment: &str, steps: &mut Vec<Step>) -> Result<(), String> {
    let (key, mut rest) = match segment.find('[') {
        Some(pos) => (&segment[..pos], &segment[pos..]),
        None => (segment, ""),
    };

    if key.is_empty() && rest.is_empty() {
        return Err("empty path segment".to_string());
    }
    if !key.is_empty() {
        steps.push(Step::Key(key.to_string()));
    }

    while !rest.is_empty() {
        let Some(inner_end) = rest.find(']') else {
            return Err(format!("unclosed bracket in '{segment}'"));
        };
        if !rest.starts_with('[') {
            return Err(format!("unexpected text in '{segment}'"));
        }
        let inner = &rest[1..inner_end];
        let step = if inner == "*" {
            Step::Each
        } else {
            inner
                .parse::<usize>()
                .map(Step::Index)
                .map_err(|_| format!("invalid index '{inner}' in '{segment}'"))?
        };
        steps.push(step);
        rest = &rest[inner_end + 1..];
    }
    Ok(())
}
