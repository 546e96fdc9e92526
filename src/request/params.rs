//! # Request Parameters
//!
//! Parsed request input plus the strong-params helpers used by `attributes`
//! blocks: [`Params::require`] demands a nested object and
//! [`Params::permit`] keeps only whitelisted keys.

use crate::model::{Record, RecordId};
use serde_json::{Map, Value};

/// Raised when a required top-level key is absent or empty.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("param is missing or the value is empty: {0}")]
pub struct ParameterMissing(pub String);

/// Request parameters as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Reads an id-like param (`id`, `product_id`, ...).
    pub fn id(&self, key: &str) -> Result<RecordId, ParameterMissing> {
        self.get(key)
            .and_then(RecordId::from_value)
            .ok_or_else(|| ParameterMissing(key.to_string()))
    }

    /// Reads a non-negative integer param. `Ok(None)` when absent, `Err` with
    /// the key when present but not a number.
    pub fn integer(&self, key: &str) -> Result<Option<u64>, String> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| key.to_string()),
            Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| key.to_string()),
            Some(_) => Err(key.to_string()),
        }
    }

    /// The nested object under `key`.
    ///
    /// Fails when the key is missing, null, an empty string or an empty
    /// object; a present non-object value is also treated as missing.
    pub fn require(&self, key: &str) -> Result<Params, ParameterMissing> {
        match self.0.get(key) {
            Some(Value::Object(inner)) if !inner.is_empty() => Ok(Params(inner.clone())),
            _ => Err(ParameterMissing(key.to_string())),
        }
    }

    /// Only the listed keys, as a record ready to persist.
    pub fn permit(&self, keys: &[&str]) -> Record {
        self.0
            .iter()
            .filter(|(k, _)| keys.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_record(self) -> Record {
        self.0
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Value> for Params {
    /// Non-object values become empty params.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}
