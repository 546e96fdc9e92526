//! # Model Interface
//!
//! The persistence layer is an external collaborator. The engine only needs a
//! small capability surface from it, described by the [`Model`] trait, and a
//! way to look models up by name, described by [`ModelResolver`].
//!
//! Records travel as JSON objects ([`Record`]) keyed by column name, with the
//! primary key stored under `"id"`.
//!
//! The [`store`](crate::store) module ships an in-memory implementation built
//! on per-model actors; any other backend only has to implement these traits.

pub mod inflect;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{self, Debug, Display};
use std::sync::Arc;

/// A single persisted row.
pub type Record = Map<String, Value>;

/// Type-safe record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl RecordId {
    /// Reads an id from a JSON value. Request params often carry ids as
    /// strings, so numeric strings are accepted too.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(Self),
            Value::String(s) => s.trim().parse().ok().map(Self),
            _ => None,
        }
    }

    /// The `"id"` column of a record.
    pub fn of(record: &Record) -> Option<Self> {
        record.get("id").and_then(Self::from_value)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How many records sit on the far side of an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// `has_one`
    One,
    /// `has_many` (or has-and-belongs-to-many)
    Many,
}

/// Failures reported by a model backend.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ModelError {
    #[error("Couldn't find {model} with id={id}")]
    NotFound { model: String, id: String },

    #[error("Unknown association `{association}' on {model}")]
    UnknownAssociation { model: String, association: String },

    #[error("{0} store is unavailable")]
    Unavailable(String),

    #[error("Invalid record: {0}")]
    Invalid(String),
}

/// The capabilities the engine needs from a persistent model.
///
/// # Associations
/// [`related`](Model::related) follows a named association from one record.
/// `has_one` associations yield at most one record. Resources nested under a
/// parent rely on [`has_association`](Model::has_association) at definition
/// time to prove that traversal will work before any request arrives.
#[async_trait]
pub trait Model: Send + Sync + Debug {
    /// Model name, e.g. `Product`.
    fn name(&self) -> &str;

    /// Whether an association with this name and cardinality is declared.
    fn has_association(&self, name: &str, cardinality: Cardinality) -> bool;

    async fn all(&self) -> Result<Vec<Record>, ModelError>;

    async fn find(&self, id: RecordId) -> Result<Option<Record>, ModelError>;

    /// Persists a new record and returns it with its assigned `id`.
    async fn create(&self, fields: Record) -> Result<Record, ModelError>;

    /// Merges `fields` into an existing record and returns the stored result.
    async fn update(&self, id: RecordId, fields: Record) -> Result<Record, ModelError>;

    async fn destroy(&self, id: RecordId) -> Result<(), ModelError>;

    /// Records reachable from `id` through `association`.
    async fn related(&self, id: RecordId, association: &str) -> Result<Vec<Record>, ModelError>;

    async fn count(&self) -> Result<usize, ModelError> {
        Ok(self.all().await?.len())
    }

    /// Like [`find`](Model::find), but a missing record is an error.
    async fn fetch(&self, id: RecordId) -> Result<Record, ModelError> {
        self.find(id).await?.ok_or_else(|| ModelError::NotFound {
            model: self.name().to_string(),
            id: id.to_string(),
        })
    }
}

/// Looks up models by name (`Product`, `Sale`, ...).
pub trait ModelResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<Arc<dyn Model>>;
}
