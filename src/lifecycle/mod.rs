//! Process-level setup for binaries and tests that embed the engine.
//!
//! - [`setup_tracing`] installs the log subscriber.
//!
//! Building models and registries is left to the caller; see
//! [`store::MemoryModels`](crate::store::MemoryModels) and
//! [`VersionRegistry`](crate::version::VersionRegistry).

pub mod tracing;

pub use self::tracing::*;
