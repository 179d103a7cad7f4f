//! Translation of [`ChartOptions`] into the service's short query keys.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::options::ChartOptions;

/// Semantic option name to provider query key.
pub const QUERY_MAP: [(&str, &str); 24] = [
    ("size", "chs"),
    ("type", "cht"),
    ("data", "chd"),
    ("dataScaling", "chds"),
    ("lineStyle", "chls"),
    ("title", "chtt"),
    ("titleColorSize", "chts"),
    ("grid", "chg"),
    ("markers", "chm"),
    ("labels", "chl"),
    ("insideLabel", "chli"),
    ("seriesColors", "chco"),
    ("legendLabels", "chdl"),
    ("legendLables", "chdl"),
    ("legendPosition", "chdlp"),
    ("legendTextColorSize", "chdls"),
    ("margins", "chma"),
    ("axes", "chxt"),
    ("axisRange", "chxr"),
    ("axisLabels", "chxl"),
    ("axisLabelColorSize", "chxs"),
    ("background", "chf"),
    ("animation", "chan"),
    ("format", "chof"),
];

/// Supported data encodings, in order of preference.
pub const DATA_FORMATS: [&str; 4] = ["a", "e", "s", "t"];

/// Keys whose separators trade places: `|` between fields, `,` between groups.
pub const INVERTED_DELIMITER_KEYS: [&str; 6] =
    ["labels", "chl", "seriesColors", "chco", "axisLabels", "chxl"];

/// Keys whose flat lists hold one entry per series, joined like groups.
const PER_SERIES_KEYS: [&str; 2] = ["seriesColors", "chco"];

const DATA_FORMAT_KEY: &str = "dataFormat";
const STACKED_KEY: &str = "stacked";

/// Look up the provider key for a semantic option name.
#[must_use]
pub fn short_key(name: &str) -> Option<&'static str> {
    QUERY_MAP
        .iter()
        .find(|(semantic, _)| *semantic == name)
        .map(|(_, short)| *short)
}

/// Flat provider query: short key to string value, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedQuery {
    params: BTreeMap<String, String>,
}

impl NormalizedQuery {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return a copy with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NormalizedQuery {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Delimiters {
    field: &'static str,
    group: &'static str,
}

impl Delimiters {
    fn for_key(name: &str, short: &str) -> Self {
        let inverted = INVERTED_DELIMITER_KEYS
            .iter()
            .any(|key| *key == name || *key == short);
        if inverted {
            Self {
                field: "|",
                group: ",",
            }
        } else {
            Self {
                field: ",",
                group: "|",
            }
        }
    }
}

/// Map caller options to the provider's flat query.
///
/// `options` is only read; calling this twice on the same options yields the
/// same query.
#[must_use]
pub fn map_options(options: &ChartOptions) -> NormalizedQuery {
    let format = data_format(options);
    let mut params = BTreeMap::new();

    for (name, value) in options.iter() {
        if name == DATA_FORMAT_KEY || name == STACKED_KEY || value.is_null() {
            continue;
        }

        let value = match name {
            "data" => prefix_data(value, &format),
            "seriesColors" => strip_hashes(value),
            "size" => collapse_size(value),
            _ => value.clone(),
        };

        let short = short_key(name).unwrap_or(name);
        let delimiters = Delimiters::for_key(name, short);
        let per_series = PER_SERIES_KEYS.contains(&name) || PER_SERIES_KEYS.contains(&short);
        params.insert(short.to_owned(), flatten(&value, delimiters, per_series));
    }

    NormalizedQuery { params }
}

fn data_format(options: &ChartOptions) -> String {
    match options.get(DATA_FORMAT_KEY) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(other) if is_present(other) => scalar_string(other),
        _ => DATA_FORMATS[0].to_owned(),
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Prefix the first numeric data point with `<format>:`.
fn prefix_data(data: &Value, format: &str) -> Value {
    let Value::Array(series) = data else {
        return data.clone();
    };
    let mut series = series.clone();
    let target = match series.first_mut() {
        Some(Value::Array(first_series)) => first_series.first_mut(),
        first => first,
    };
    if let Some(point) = target
        && let Value::Number(n) = point
    {
        let prefixed = format!("{format}:{}", number_string(n));
        *point = Value::String(prefixed);
    }
    Value::Array(series)
}

/// Drop leading `#` from every color string, however deeply nested.
fn strip_hashes(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.trim_start_matches('#').to_owned()),
        Value::Array(items) => Value::Array(items.iter().map(strip_hashes).collect()),
        other => other.clone(),
    }
}

fn collapse_size(value: &Value) -> Value {
    match value {
        Value::Array(dims) if dims.len() == 2 => Value::String(format!(
            "{}x{}",
            scalar_string(&dims[0]),
            scalar_string(&dims[1])
        )),
        other => other.clone(),
    }
}

fn flatten(value: &Value, delimiters: Delimiters, per_series: bool) -> String {
    let Value::Array(items) = value else {
        return scalar_string(value);
    };

    if matches!(items.first(), Some(Value::Array(_))) {
        let groups: Vec<String> = items
            .iter()
            .map(|group| match group {
                Value::Array(fields) => join(fields, delimiters.field),
                other => scalar_string(other),
            })
            .collect();
        return groups.join(delimiters.group);
    }

    let separator = if per_series {
        delimiters.group
    } else {
        delimiters.field
    };
    join(items, separator)
}

fn join(items: &[Value], separator: &str) -> String {
    items
        .iter()
        .map(scalar_string)
        .collect::<Vec<_>>()
        .join(separator)
}

/// String form of a single value; nested sequences beyond a group join with `,`.
fn scalar_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_string(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => join(items, ","),
        Value::Object(_) => value.to_string(),
    }
}

fn number_string(n: &serde_json::Number) -> String {
    if n.is_f64() {
        n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string())
    } else {
        n.to_string()
    }
}
