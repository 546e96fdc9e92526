//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the
//! `tracing` crate. Every request goes through [`Resolver::resolve`], which
//! opens a span carrying the version, resource path and action, so every log
//! line emitted while resolving sits under that span.
//!
//! ## Configuration
//!
//! The subscriber uses a compact format that hides the module prefix
//! (`with_target(false)`). Levels come from `RUST_LOG`:
//!
//! ```bash
//! # Lifecycle only: versions defined, requests resolved, stores started
//! RUST_LOG=info cargo run
//!
//! # Graph construction and store traffic
//! RUST_LOG=debug cargo run
//!
//! # Only the resolver
//! RUST_LOG=versioned_api::request=debug cargo run
//! ```
//!
//! ## What Gets Traced
//!
//! - **Definitions**: `info` when a version is defined, `debug` per resource
//! - **Requests**: `info` on success or deferral, `warn` on rejection
//! - **Stores**: actor startup and shutdown, `debug` per operation
//!
//! ## Example
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO Store started model="Product"
//! INFO In-memory models started count=3
//! INFO version: Version defined version="1.0.0" ancestor=None resources=1
//! INFO version: Version defined version="1.1.0" ancestor=Some("1.0.0") resources=2
//! INFO resolve: Request resolved version="1.1.0" path=products action=index status=ok
//! WARN resolve: Request rejected version="3" path=products action=index status=bad_request error=Unknown API version: 3
//! ```
//!
//! **With `RUST_LOG=debug`** the same run also shows where each request
//! went and what the store actors did. Store actors run in their own tasks,
//! outside the request span:
//!
//! ```text
//! DEBUG resolve: Action located kind=Show depth=2
//! DEBUG Get model="Sale" id=1 found=true
//! ```
//!
//! [`Resolver::resolve`]: crate::request::Resolver::resolve

/// Installs the global `tracing` subscriber. Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
