//! Variable values supplied to template expansion.

use std::collections::{BTreeMap, HashMap};

/// A value bound to a template variable.
///
/// Associative values keep the order the caller supplied them in, so an
/// expansion is a pure function of its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    List(Vec<String>),
    Assoc(Vec<(String, String)>),
}

impl Value {
    /// Build a list value from anything stringifiable.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Value::List(items.into_iter().map(|i| i.to_string()).collect())
    }

    /// Build an associative value, preserving iteration order.
    pub fn assoc<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: ToString,
        V: ToString,
    {
        Value::Assoc(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// RFC 6570 treats empty lists and empty associative arrays as undefined.
    pub fn is_undefined(&self) -> bool {
        match self {
            Value::String(_) => false,
            Value::List(items) => items.is_empty(),
            Value::Assoc(pairs) => pairs.is_empty(),
        }
    }

    /// Convert a JSON value. `null` and nested composites have no template
    /// representation and yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::Array(items) => {
                let items = items.iter().map(json_scalar).collect::<Option<Vec<_>>>()?;
                Some(Value::List(items))
            }
            serde_json::Value::Object(map) => {
                let pairs = map
                    .iter()
                    .map(|(k, v)| json_scalar(v).map(|v| (k.clone(), v)))
                    .collect::<Option<Vec<_>>>()?;
                Some(Value::Assoc(pairs))
            }
            scalar => json_scalar(scalar).map(Value::String),
        }
    }
}

fn json_scalar(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

macro_rules! scalar_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::String(value.to_string())
                }
            }
        )*
    };
}

scalar_from!(bool, i32, i64, u32, u64, usize, f64);

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Value::List(value)
    }
}

impl From<Vec<&str>> for Value {
    fn from(value: Vec<&str>) -> Self {
        Value::list(value)
    }
}

impl From<Vec<(String, String)>> for Value {
    fn from(value: Vec<(String, String)>) -> Self {
        Value::Assoc(value)
    }
}

impl From<Vec<(&str, &str)>> for Value {
    fn from(value: Vec<(&str, &str)>) -> Self {
        Value::assoc(value)
    }
}

impl<K: ToString, V: ToString> From<BTreeMap<K, V>> for Value {
    fn from(value: BTreeMap<K, V>) -> Self {
        Value::assoc(value)
    }
}

/// Errors converting external data into bindings.
#[derive(Debug, thiserror::Error)]
pub enum BindingsError {
    #[error("Bindings must be a JSON object, got {0}")]
    NotAnObject(String),

    #[error("Variable {0} has a value that cannot be expanded")]
    UnsupportedValue(String),

    #[error("Expected name=value, got {0:?}")]
    MalformedPair(String),
}

/// Named variable values for one expansion.
///
/// A name that is not present is "absent" and expands to nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: HashMap<String, Value>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build bindings from a JSON object. `null` members are skipped.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, BindingsError> {
        let map = match value {
            serde_json::Value::Object(map) => map,
            other => return Err(BindingsError::NotAnObject(json_kind(other).to_string())),
        };

        let mut bindings = Bindings::new();
        for (name, raw) in map {
            if raw.is_null() {
                continue;
            }
            let value = Value::from_json(raw)
                .ok_or_else(|| BindingsError::UnsupportedValue(name.clone()))?;
            bindings.insert(name.clone(), value);
        }
        Ok(bindings)
    }

    /// Parse a `name=value` pair as given on the command line.
    pub fn insert_pair(&mut self, pair: &str) -> Result<(), BindingsError> {
        let (name, value) = pair
            .split_once('=')
            .filter(|(name, _)| !name.is_empty())
            .ok_or_else(|| BindingsError::MalformedPair(pair.to_string()))?;
        self.insert(name, value);
        Ok(())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bindings = Bindings::new();
        for (k, v) in iter {
            bindings.insert(k, v);
        }
        bindings
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_are_stringified() {
        assert_eq!(Value::from(42i64), Value::String("42".into()));
        assert_eq!(Value::from(true), Value::String("true".into()));
        assert_eq!(Value::from(1.5f64), Value::String("1.5".into()));
    }

    #[test]
    fn test_empty_composites_are_undefined() {
        assert!(Value::List(vec![]).is_undefined());
        assert!(Value::Assoc(vec![]).is_undefined());
        assert!(!Value::String(String::new()).is_undefined());
    }

    #[test]
    fn test_from_json_object() {
        let bindings = Bindings::from_json(&json!({
            "username": "foobar",
            "page": 2,
            "tags": ["a", "b"],
            "query": {"recent_posts": true},
            "missing": null
        }))
        .unwrap();

        assert_eq!(bindings.len(), 4);
        assert_eq!(bindings.get("page"), Some(&Value::String("2".into())));
        assert_eq!(bindings.get("tags"), Some(&Value::list(["a", "b"])));
        assert_eq!(
            bindings.get("query"),
            Some(&Value::assoc([("recent_posts", "true")]))
        );
        assert!(bindings.get("missing").is_none());
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = Bindings::from_json(&json!(["a"])).unwrap_err();
        assert!(matches!(err, BindingsError::NotAnObject(ref kind) if kind == "array"));
    }

    #[test]
    fn test_from_json_rejects_nested_composites() {
        let err = Bindings::from_json(&json!({"deep": {"a": {"b": "c"}}})).unwrap_err();
        assert!(matches!(err, BindingsError::UnsupportedValue(ref name) if name == "deep"));
    }

    #[test]
    fn test_insert_pair() {
        let mut bindings = Bindings::new();
        bindings.insert_pair("username=foo=bar").unwrap();
        assert_eq!(bindings.get("username"), Some(&Value::from("foo=bar")));
        assert!(bindings.insert_pair("novalue").is_err());
        assert!(bindings.insert_pair("=x").is_err());
    }
}
