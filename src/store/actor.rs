//! # Store Actor
//!
//! The server half of the in-memory store. One actor owns the records of one
//! model and processes requests sequentially, so the record map needs no lock.

use super::client::StoreClient;
use super::error::StoreError;
use super::message::StoreRequest;
use crate::model::{Record, RecordId};
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Owns the records of a single model.
///
/// Records are kept in a `BTreeMap` keyed by id, and ids are assigned from a
/// monotonically increasing counter, so iteration order equals insertion
/// order. Index actions and paging depend on that.
pub struct StoreActor {
    model: String,
    receiver: mpsc::Receiver<StoreRequest>,
    records: BTreeMap<RecordId, Record>,
    next_id: u64,
}

impl StoreActor {
    /// Creates the actor and the client used to talk to it.
    ///
    /// `buffer_size` is the channel capacity; callers wait when it is full.
    pub fn new(model: impl Into<String>, buffer_size: usize) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            model: model.into(),
            receiver,
            records: BTreeMap::new(),
            next_id: 1,
        };
        let client = StoreClient::new(sender);
        (actor, client)
    }

    /// Runs the event loop until every client has been dropped.
    pub async fn run(mut self) {
        let model = self.model.clone();
        let model = model.as_str();
        info!(model, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::All { respond_to } => {
                    debug!(model, size = self.records.len(), "All");
                    let _ = respond_to.send(Ok(self.records.values().cloned().collect()));
                }
                StoreRequest::Get { id, respond_to } => {
                    let record = self.records.get(&id).cloned();
                    debug!(model, %id, found = record.is_some(), "Get");
                    let _ = respond_to.send(Ok(record));
                }
                StoreRequest::Create { mut fields, respond_to } => {
                    debug!(model, ?fields, "Create");
                    let id = RecordId(self.next_id);
                    self.next_id += 1;
                    fields.insert("id".to_string(), Value::from(id.0));
                    self.records.insert(id, fields.clone());
                    info!(model, %id, size = self.records.len(), "Created");
                    let _ = respond_to.send(Ok(fields));
                }
                StoreRequest::Update {
                    id,
                    fields,
                    respond_to,
                } => {
                    debug!(model, %id, ?fields, "Update");
                    match self.records.get_mut(&id) {
                        Some(record) => {
                            for (key, value) in fields {
                                if key != "id" {
                                    record.insert(key, value);
                                }
                            }
                            info!(model, %id, "Updated");
                            let _ = respond_to.send(Ok(record.clone()));
                        }
                        None => {
                            warn!(model, %id, "Not found");
                            let _ = respond_to.send(Err(StoreError::NotFound(id.to_string())));
                        }
                    }
                }
                StoreRequest::Delete { id, respond_to } => {
                    debug!(model, %id, "Delete");
                    if self.records.remove(&id).is_some() {
                        info!(model, %id, size = self.records.len(), "Deleted");
                        let _ = respond_to.send(Ok(()));
                    } else {
                        warn!(model, %id, "Not found");
                        let _ = respond_to.send(Err(StoreError::NotFound(id.to_string())));
                    }
                }
                StoreRequest::Filter {
                    field,
                    value,
                    respond_to,
                } => {
                    let matches: Vec<Record> = self
                        .records
                        .values()
                        .filter(|r| r.get(&field).is_some_and(|v| same_value(v, &value)))
                        .cloned()
                        .collect();
                    debug!(model, %field, %value, found = matches.len(), "Filter");
                    let _ = respond_to.send(Ok(matches));
                }
            }
        }

        info!(model, size = self.records.len(), "Shutdown");
    }
}

/// Equality that tolerates ids stored as numbers on one side and as strings
/// on the other, since foreign keys often arrive as request params.
fn same_value(stored: &Value, wanted: &Value) -> bool {
    if stored == wanted {
        return true;
    }
    match (RecordId::from_value(stored), RecordId::from_value(wanted)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_store_actor_crud() {
        let (actor, client) = StoreActor::new("Product", 10);
        tokio::spawn(actor.run());

        // 1. Create assigns ids in order
        let first = client.create(record(json!({ "title": "lamp" }))).await.unwrap();
        let second = client.create(record(json!({ "title": "desk" }))).await.unwrap();
        assert_eq!(first["id"], json!(1));
        assert_eq!(second["id"], json!(2));

        // 2. Update merges fields but never the id
        let updated = client
            .update(RecordId(1), record(json!({ "title": "floor lamp", "id": 99 })))
            .await
            .unwrap();
        assert_eq!(updated["title"], json!("floor lamp"));
        assert_eq!(updated["id"], json!(1));

        // 3. Delete
        client.delete(RecordId(2)).await.unwrap();
        assert_eq!(client.all().await.unwrap().len(), 1);
        assert!(client.get(RecordId(2)).await.unwrap().is_none());

        // 4. Deleting again reports the missing record
        let err = client.delete(RecordId(2)).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound("2".into()));
    }

    #[tokio::test]
    async fn test_filter_matches_string_and_numeric_keys() {
        let (actor, client) = StoreActor::new("Sale", 10);
        tokio::spawn(actor.run());

        client.create(record(json!({ "product_id": 1 }))).await.unwrap();
        client.create(record(json!({ "product_id": "1" }))).await.unwrap();
        client.create(record(json!({ "product_id": 2 }))).await.unwrap();

        let matches = client.filter("product_id", json!(1)).await.unwrap();
        assert_eq!(matches.len(), 2);
    }
}
