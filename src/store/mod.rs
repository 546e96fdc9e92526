//! # In-Memory Store
//!
//! A reference [`ModelResolver`](crate::model::ModelResolver) backend. Each
//! model's records are owned by a [`StoreActor`] running in its own Tokio
//! task; everything else talks to it through a cloneable [`StoreClient`].
//!
//! - [`StoreActor`] / [`StoreClient`]: the actor and its handle.
//! - [`MemoryModel`]: implements [`Model`](crate::model::Model) over a client,
//!   with `has_many` / `has_one` associations resolved by foreign key.
//! - [`MemoryModels`]: builds and spawns the actors, resolves models by name,
//!   and shuts everything down.
//!
//! Used by the demo binary and the integration tests. Production deployments
//! plug their own persistence in behind the same traits.

pub mod actor;
pub mod client;
pub mod error;
pub mod message;
pub mod model;
pub mod system;

pub use actor::StoreActor;
pub use client::StoreClient;
pub use error::StoreError;
pub use message::{Response, StoreRequest};
pub use model::{Association, MemoryModel};
pub use system::{MemoryModels, MemoryModelsBuilder};
