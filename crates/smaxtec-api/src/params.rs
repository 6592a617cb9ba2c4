// Ordered request parameters
//
// Endpoint methods assemble query strings and JSON bodies from a `Params`
// value. Absent values never reach the wire: anything that converts to
// `null` (typically `Option::None`) is dropped on insertion, while falsy
// values such as `0`, `false`, or `""` are kept.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// An insertion-ordered parameter set.
///
/// ```
/// use smaxtec_api::Params;
///
/// let params = Params::new()
///     .with("a", 1)
///     .with("b", None::<i64>)
///     .with("c", 0);
/// assert_eq!(serde_json::to_string(&params).unwrap(), r#"{"a":1,"c":0}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params(IndexMap<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or replace `key`. A replaced key keeps its position; a `null`
    /// value removes the key instead.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if value.is_null() {
            self.0.shift_remove(&key);
        } else {
            self.0.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Flatten into `(key, value)` pairs for a query string.
    ///
    /// Arrays expand into one pair per element under the same key; objects
    /// and nested arrays are sent as JSON text.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.0.len());
        for (key, value) in self {
            match value {
                Value::Array(items) => {
                    for item in items {
                        if !item.is_null() {
                            pairs.push((key.clone(), query_text(item)));
                        }
                    }
                }
                other => pairs.push((key.clone(), query_text(other))),
            }
        }
        pairs
    }
}

fn query_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn absent_values_are_dropped_and_order_kept() {
        let params = Params::new()
            .with("a", 1)
            .with("b", None::<i64>)
            .with("c", 0);
        let keys: Vec<_> = params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert_eq!(serde_json::to_value(&params).unwrap(), json!({"a": 1, "c": 0}));
    }

    #[test]
    fn falsy_values_survive() {
        let params = Params::new()
            .with("zero", 0)
            .with("no", false)
            .with("empty", "")
            .with("list", Vec::<String>::new());
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn set_replaces_in_place() {
        let mut params = Params::new().with("limit", 100).with("offset", 0);
        params.set("limit", 50);
        params.set("offset", 200);
        let pairs = params.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("limit".to_string(), "50".to_string()),
                ("offset".to_string(), "200".to_string()),
            ]
        );
    }

    #[test]
    fn setting_none_removes_an_existing_key() {
        let mut params = Params::new().with("to_ts", 10);
        params.set("to_ts", None::<i64>);
        assert!(!params.contains_key("to_ts"));
    }

    #[test]
    fn arrays_expand_to_repeated_keys() {
        let params = Params::new()
            .with("metrics", vec!["temp", "act"])
            .with("include_animal", true)
            .with("meta", json!({"k": "v"}));
        assert_eq!(
            params.to_query_pairs(),
            vec![
                ("metrics".to_string(), "temp".to_string()),
                ("metrics".to_string(), "act".to_string()),
                ("include_animal".to_string(), "true".to_string()),
                ("meta".to_string(), r#"{"k":"v"}"#.to_string()),
            ]
        );
    }

    #[test]
    fn collects_from_pairs() {
        let params: Params = [("x", Some(1)), ("y", None), ("z", Some(3))]
            .into_iter()
            .collect();
        assert_eq!(params.get("z"), Some(&json!(3)));
        assert_eq!(params.len(), 2);
    }
}
