//! # Store Messages
//!
//! The request vocabulary between a [`StoreClient`](super::StoreClient) and
//! its [`StoreActor`](super::StoreActor). Each variant carries a one-shot
//! channel for the reply.

use super::error::StoreError;
use crate::model::{Record, RecordId};
use serde_json::Value;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by store actors.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Operations a record store understands.
///
/// The variants mirror the persistence capabilities the engine asks of a
/// model: list, fetch, insert, merge-update, delete, plus an equality filter
/// used to walk foreign-key associations.
#[derive(Debug)]
pub enum StoreRequest {
    All {
        respond_to: Response<Vec<Record>>,
    },
    Get {
        id: RecordId,
        respond_to: Response<Option<Record>>,
    },
    Create {
        fields: Record,
        respond_to: Response<Record>,
    },
    Update {
        id: RecordId,
        fields: Record,
        respond_to: Response<Record>,
    },
    Delete {
        id: RecordId,
        respond_to: Response<()>,
    },
    Filter {
        field: String,
        value: Value,
        respond_to: Response<Vec<Record>>,
    },
}
