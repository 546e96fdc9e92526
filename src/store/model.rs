//! [`Model`] implementation on top of a [`StoreClient`].

use super::client::StoreClient;
use crate::model::{Cardinality, Model, ModelError, Record, RecordId};
use async_trait::async_trait;
use serde_json::Value;

/// A declared association from one in-memory model to another, resolved by a
/// foreign key column on the target side.
#[derive(Debug, Clone)]
pub struct Association {
    pub name: String,
    pub cardinality: Cardinality,
    pub foreign_key: String,
    pub target: StoreClient,
}

/// A model whose records live in a [`StoreActor`](super::StoreActor).
#[derive(Debug, Clone)]
pub struct MemoryModel {
    name: String,
    client: StoreClient,
    associations: Vec<Association>,
}

impl MemoryModel {
    pub fn new(name: impl Into<String>, client: StoreClient, associations: Vec<Association>) -> Self {
        Self {
            name: name.into(),
            client,
            associations,
        }
    }

    pub fn client(&self) -> &StoreClient {
        &self.client
    }

    pub fn associations(&self) -> &[Association] {
        &self.associations
    }
}

#[async_trait]
impl Model for MemoryModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_association(&self, name: &str, cardinality: Cardinality) -> bool {
        self.associations
            .iter()
            .any(|a| a.name == name && a.cardinality == cardinality)
    }

    async fn all(&self) -> Result<Vec<Record>, ModelError> {
        self.client
            .all()
            .await
            .map_err(|e| e.into_model_error(&self.name))
    }

    async fn find(&self, id: RecordId) -> Result<Option<Record>, ModelError> {
        self.client
            .get(id)
            .await
            .map_err(|e| e.into_model_error(&self.name))
    }

    async fn create(&self, fields: Record) -> Result<Record, ModelError> {
        self.client
            .create(fields)
            .await
            .map_err(|e| e.into_model_error(&self.name))
    }

    async fn update(&self, id: RecordId, fields: Record) -> Result<Record, ModelError> {
        self.client
            .update(id, fields)
            .await
            .map_err(|e| e.into_model_error(&self.name))
    }

    async fn destroy(&self, id: RecordId) -> Result<(), ModelError> {
        self.client
            .delete(id)
            .await
            .map_err(|e| e.into_model_error(&self.name))
    }

    async fn related(&self, id: RecordId, association: &str) -> Result<Vec<Record>, ModelError> {
        let Some(assoc) = self.associations.iter().find(|a| a.name == association) else {
            return Err(ModelError::UnknownAssociation {
                model: self.name.clone(),
                association: association.to_string(),
            });
        };

        let mut records = assoc
            .target
            .filter(assoc.foreign_key.clone(), Value::from(id.0))
            .await
            .map_err(|e| e.into_model_error(&self.name))?;

        if assoc.cardinality == Cardinality::One {
            records.truncate(1);
        }
        Ok(records)
    }
}
