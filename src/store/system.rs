use super::actor::StoreActor;
use super::client::StoreClient;
use super::error::StoreError;
use super::model::{Association, MemoryModel};
use crate::model::inflect::singularize;
use crate::model::{Cardinality, Model, ModelResolver};
use heck::ToSnakeCase;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

/// Declares the models and associations of an in-memory backend.
///
/// # Example
///
/// ```ignore
/// let models = MemoryModels::builder()
///     .model("Product")
///     .model("Sale")
///     .model("Payment")
///     .has_many("Product", "sales", "Sale")
///     .has_one("Sale", "payment", "Payment")
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct MemoryModelsBuilder {
    buffer_size: usize,
    models: Vec<String>,
    associations: Vec<AssociationSpec>,
}

#[derive(Debug)]
struct AssociationSpec {
    owner: String,
    name: String,
    target: String,
    cardinality: Cardinality,
    foreign_key: String,
}

impl MemoryModelsBuilder {
    /// Channel capacity of every store actor.
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn model(mut self, name: impl Into<String>) -> Self {
        self.models.push(name.into());
        self
    }

    /// `owner has_many name`, keyed by `<owner>_id` on the target.
    pub fn has_many(self, owner: &str, name: &str, target: &str) -> Self {
        let foreign_key = default_foreign_key(owner);
        self.association(owner, name, target, Cardinality::Many, foreign_key)
    }

    /// `owner has_one name`, keyed by `<owner>_id` on the target.
    pub fn has_one(self, owner: &str, name: &str, target: &str) -> Self {
        let foreign_key = default_foreign_key(owner);
        self.association(owner, name, target, Cardinality::One, foreign_key)
    }

    pub fn association(
        mut self,
        owner: &str,
        name: &str,
        target: &str,
        cardinality: Cardinality,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.associations.push(AssociationSpec {
            owner: owner.to_string(),
            name: name.to_string(),
            target: target.to_string(),
            cardinality,
            foreign_key: foreign_key.into(),
        });
        self
    }

    /// Spawns one store actor per model and wires the associations.
    ///
    /// Must be called from within a Tokio runtime. Associations that point at
    /// undeclared models are dropped with an error log.
    pub fn build(self) -> MemoryModels {
        let buffer_size = if self.buffer_size == 0 { 32 } else { self.buffer_size };

        // 1. Create and start one actor per model
        let mut clients: HashMap<String, StoreClient> = HashMap::new();
        let mut handles = Vec::new();
        for name in &self.models {
            let (actor, client) = StoreActor::new(name.clone(), buffer_size);
            handles.push(tokio::spawn(actor.run()));
            clients.insert(name.clone(), client);
        }

        // 2. Wire associations to the target stores
        let mut associations: HashMap<String, Vec<Association>> = HashMap::new();
        for spec in self.associations {
            let Some(target) = clients.get(&spec.target) else {
                error!(owner = %spec.owner, target = %spec.target, "Association target is not a declared model");
                continue;
            };
            associations
                .entry(spec.owner)
                .or_default()
                .push(Association {
                    name: spec.name,
                    cardinality: spec.cardinality,
                    foreign_key: spec.foreign_key,
                    target: target.clone(),
                });
        }

        let models = clients
            .into_iter()
            .map(|(name, client)| {
                let assocs = associations.remove(&name).unwrap_or_default();
                let model = Arc::new(MemoryModel::new(name.clone(), client, assocs));
                (name, model)
            })
            .collect();

        info!(count = handles.len(), "In-memory models started");
        MemoryModels { models, handles }
    }
}

fn default_foreign_key(owner: &str) -> String {
    format!("{}_id", singularize(&owner.to_snake_case()))
}

/// The running in-memory backend: a [`ModelResolver`] over actor-backed models.
///
/// Every model's actor runs in its own task. Dropping every handle to a model
/// (including the ones held by a version registry) closes its channel and lets
/// the actor exit; [`shutdown`](Self::shutdown) waits for that to happen.
pub struct MemoryModels {
    models: HashMap<String, Arc<MemoryModel>>,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl MemoryModels {
    pub fn builder() -> MemoryModelsBuilder {
        MemoryModelsBuilder::default()
    }

    pub fn model(&self, name: &str) -> Option<Arc<MemoryModel>> {
        self.models.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.models.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Gracefully stops every store actor.
    ///
    /// Drops the models held here, then waits for each actor task to finish.
    /// Anything else still holding a model (a registry, a resolver) must be
    /// dropped first or this waits for it.
    pub async fn shutdown(self) -> Result<(), StoreError> {
        info!("Shutting down in-memory models...");
        drop(self.models);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Store task failed: {:?}", e);
                return Err(StoreError::TaskFailed(e.to_string()));
            }
        }

        info!("In-memory models shut down.");
        Ok(())
    }
}

impl ModelResolver for MemoryModels {
    fn resolve(&self, name: &str) -> Option<Arc<dyn Model>> {
        self.models
            .get(name)
            .map(|model| Arc::clone(model) as Arc<dyn Model>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelError, Record, RecordId};
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_associations_follow_foreign_keys() {
        let models = MemoryModels::builder()
            .model("Sale")
            .model("Payment")
            .model("Product")
            .has_many("Product", "sales", "Sale")
            .has_one("Sale", "payment", "Payment")
            .build();

        let product = models.resolve("Product").unwrap();
        let sale = models.resolve("Sale").unwrap();
        let payment = models.resolve("Payment").unwrap();

        assert!(product.has_association("sales", Cardinality::Many));
        assert!(!product.has_association("sales", Cardinality::One));
        assert!(sale.has_association("payment", Cardinality::One));

        let p = product.create(record(json!({ "title": "lamp" }))).await.unwrap();
        let p_id = RecordId::of(&p).unwrap();
        let s1 = sale.create(record(json!({ "product_id": p_id.0 }))).await.unwrap();
        sale.create(record(json!({ "product_id": p_id.0 }))).await.unwrap();
        sale.create(record(json!({ "product_id": 42 }))).await.unwrap();

        let s1_id = RecordId::of(&s1).unwrap();
        payment.create(record(json!({ "sale_id": s1_id.0, "amount": 5 }))).await.unwrap();

        assert_eq!(product.related(p_id, "sales").await.unwrap().len(), 2);
        let paid = sale.related(s1_id, "payment").await.unwrap();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0]["amount"], json!(5));

        let err = sale.related(s1_id, "refunds").await.unwrap_err();
        assert!(matches!(err, ModelError::UnknownAssociation { .. }));
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_actors() {
        let models = MemoryModels::builder().model("Product").build();
        assert_eq!(models.names(), vec!["Product"]);
        assert!(models.resolve("Sale").is_none());
        models.shutdown().await.unwrap();
    }
}
