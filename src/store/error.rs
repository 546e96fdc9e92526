//! # Store Errors
//!
//! Failures of the in-memory record store. These stay inside the store module;
//! [`MemoryModel`](crate::store::MemoryModel) converts them into
//! [`ModelError`] at the model boundary.

use crate::model::ModelError;

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum StoreError {
    #[error("Store actor closed")]
    ActorClosed,
    #[error("Store actor dropped response channel")]
    ActorDropped,
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Invalid record: {0}")]
    Invalid(String),
    #[error("Store task failed: {0}")]
    TaskFailed(String),
}

impl StoreError {
    pub(crate) fn into_model_error(self, model: &str) -> ModelError {
        match self {
            StoreError::NotFound(id) => ModelError::NotFound {
                model: model.to_string(),
                id,
            },
            StoreError::Invalid(reason) => ModelError::Invalid(reason),
            StoreError::ActorClosed | StoreError::ActorDropped | StoreError::TaskFailed(_) => {
                ModelError::Unavailable(model.to_string())
            }
        }
    }
}
