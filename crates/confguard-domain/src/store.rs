use serde_json::{Map, Value};

/// In-memory data documents visible to rules during one evaluation run.
///
/// A store belongs to a single [`crate::TestRun`]; nothing is shared between runs.
#[derive(Clone, Debug, PartialEq)]
pub struct Store {
    root: Value,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a data document under `key`, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        match &mut self.root {
            Value::Object(map) => map.insert(key.into(), value),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// The whole store as one object, keyed by document name.
    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.root.as_object().map(Map::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
