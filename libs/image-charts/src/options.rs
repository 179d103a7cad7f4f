use serde_json::{Map, Value};

/// Caller-facing chart description: option name to JSON value.
///
/// Values may be scalars, flat sequences, or sequences of sequences; see
/// [`map_options`](crate::map_options) for how each shape is flattened.
/// Options are never mutated by the library: every transformation returns a
/// fresh value, so one `ChartOptions` can be reused across requests.
///
/// ```
/// use image_charts::ChartOptions;
/// use serde_json::json;
///
/// let options = ChartOptions::new()
///     .with("size", json!([700, 700]))
///     .with("data", json!([60, 40]))
///     .with("title", "Share");
/// assert_eq!(options.get("title"), Some(&json!("Share")));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartOptions {
    entries: Map<String, Value>,
}

impl ChartOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Return a copy without `key`.
    #[must_use]
    pub fn without(mut self, key: &str) -> Self {
        self.entries.remove(key);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether `key` is present with a truthy value (non-zero number,
    /// non-empty string, `true`, or any sequence/object).
    #[must_use]
    pub fn is_set(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(is_truthy)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl From<Map<String, Value>> for ChartOptions {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

/// Non-object JSON values yield empty options.
impl From<Value> for ChartOptions {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(entries) => Self { entries },
            _ => Self::default(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ChartOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
