//! Typed, defaulting access over an untyped JSON document
//!
//! Lookups address top-level keys only and never fail: a key that is absent,
//! or present with a value that does not convert to the requested type,
//! yields the caller's default.

use super::error::ConfigResult;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::ops::Index;
use std::path::Path;

static NULL: Value = Value::Null;

/// Total conversion from a JSON value
///
/// `None` means "not this type"; callers substitute their default.
pub trait FromJson: Sized {
    fn from_json(value: &Value) -> Option<Self>;
}

impl FromJson for i64 {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FromJson for usize {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_u64().and_then(|v| usize::try_from(v).ok())
    }
}

impl FromJson for u32 {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_u64().and_then(|v| u32::try_from(v).ok())
    }
}

impl FromJson for bool {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromJson for String {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

/// All-or-nothing: one non-string element rejects the whole array
impl FromJson for Vec<String> {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_array()?.iter().map(String::from_json).collect()
    }
}

impl FromJson for HashSet<String> {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_array()?.iter().map(String::from_json).collect()
    }
}

impl FromJson for HashMap<String, Vec<String>> {
    fn from_json(value: &Value) -> Option<Self> {
        value
            .as_object()?
            .iter()
            .map(|(k, v)| Vec::<String>::from_json(v).map(|list| (k.clone(), list)))
            .collect()
    }
}

impl FromJson for Value {
    fn from_json(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

/// Read-only wrapper over a JSON configuration document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonWrapper {
    config: Value,
}

impl JsonWrapper {
    pub fn new(config: Value) -> Self {
        Self { config }
    }

    /// Parse a document from a string
    pub fn from_str(text: &str) -> ConfigResult<Self> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    /// Parse a document from a file
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_str(&text)
    }

    /// Look up `name`, falling back to `default` when absent or mistyped
    pub fn get<T: FromJson>(&self, name: &str, default: T) -> T {
        self.config
            .get(name)
            .and_then(T::from_json)
            .unwrap_or(default)
    }

    /// Same lookup as [`get`](Self::get), written into `param`
    pub fn get_into<T: FromJson>(&self, name: &str, default: T, param: &mut T) {
        *param = self.get(name, default);
    }

    /// String lookup with a borrowed default
    pub fn get_string(&self, name: &str, default: &str) -> String {
        self.config
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    /// Raw value at `name`, or `Value::Null` when absent
    pub fn value(&self, name: &str) -> &Value {
        self.config.get(name).unwrap_or(&NULL)
    }

    /// Nested section wrapped for the same defaulting API
    ///
    /// A missing section gives an empty wrapper, so every lookup on it
    /// returns its default.
    pub fn section(&self, name: &str) -> JsonWrapper {
        JsonWrapper::new(self.value(name).clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.config.get(name).is_some()
    }

    /// True for null documents and empty objects/arrays
    pub fn is_empty(&self) -> bool {
        match &self.config {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.config
    }
}

impl Index<&str> for JsonWrapper {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        self.value(name)
    }
}

impl From<Value> for JsonWrapper {
    fn from(config: Value) -> Self {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> JsonWrapper {
        JsonWrapper::new(json!({
            "limit": 12,
            "negative": -4,
            "name": "redex",
            "enabled": true,
            "list": ["a", "b", "a"],
            "mixed": ["a", 1],
            "lists": { "x": ["Lx;"], "y": [] },
            "nested": { "max_inline_size": 50 }
        }))
    }

    #[test]
    fn test_present_values() {
        let jw = sample();
        assert_eq!(jw.get("limit", 0i64), 12);
        assert_eq!(jw.get("limit", 0usize), 12);
        assert_eq!(jw.get("name", String::new()), "redex");
        assert!(jw.get("enabled", false));
        assert_eq!(jw.get("list", Vec::<String>::new()), vec!["a", "b", "a"]);
        assert_eq!(jw.get("list", HashSet::<String>::new()).len(), 2);

        let lists = jw.get("lists", HashMap::<String, Vec<String>>::new());
        assert_eq!(lists["x"], vec!["Lx;"]);
        assert!(lists["y"].is_empty());
    }

    #[test]
    fn test_absent_keys_use_default() {
        let jw = sample();
        assert_eq!(jw.get("missing", 7i64), 7);
        assert_eq!(jw.get_string("missing", "dflt"), "dflt");
        assert!(jw.get("missing", true));
    }

    #[test]
    fn test_mistyped_values_use_default() {
        let jw = sample();
        assert_eq!(jw.get("name", 3i64), 3);
        assert_eq!(jw.get("negative", 9usize), 9);
        assert!(!jw.get("limit", false));
        assert_eq!(jw.get("enabled", String::from("x")), "x");
        assert_eq!(
            jw.get("mixed", vec![String::from("fallback")]),
            vec!["fallback"]
        );
        assert!(jw.get("list", HashMap::<String, Vec<String>>::new()).is_empty());
    }

    #[test]
    fn test_get_into_writes_in_place() {
        let jw = sample();
        let mut limit = 0usize;
        jw.get_into("limit", 1, &mut limit);
        assert_eq!(limit, 12);

        let mut name = String::from("before");
        jw.get_into("absent", String::from("after"), &mut name);
        assert_eq!(name, "after");
    }

    #[test]
    fn test_index_returns_null_sentinel() {
        let jw = sample();
        assert_eq!(jw["limit"], json!(12));
        assert!(jw["missing"].is_null());
        assert!(JsonWrapper::default()["anything"].is_null());
    }

    #[test]
    fn test_non_object_document() {
        let jw = JsonWrapper::new(json!([1, 2, 3]));
        assert_eq!(jw.get("0", 5i64), 5);
        assert!(jw.value("0").is_null());
    }

    #[test]
    fn test_section() {
        let jw = sample();
        assert_eq!(jw.section("nested").get("max_inline_size", 0usize), 50);
        assert!(jw.section("missing").is_empty());
        assert!(jw.contains("nested"));
        assert!(!jw.contains("Nested"));
    }

    #[test]
    fn test_from_str() {
        let jw = JsonWrapper::from_str(r#"{"k": 1}"#).unwrap();
        assert_eq!(jw.get("k", 0i64), 1);
        assert!(JsonWrapper::from_str("{ broken").is_err());
    }
}
