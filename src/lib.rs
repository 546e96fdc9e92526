#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Versioned API
//!
//! > **Declare an API once per version, resolve requests against it.**
//!
//! This crate is the engine behind a versioned REST API. You declare, per
//! SemVer-numbered version, which resources exist, which actions each one
//! responds to, and how those actions behave. Each version inherits
//! everything from the one before it and then adds, extends, or removes.
//! At request time, a [`Resolver`](request::Resolver) picks the version from
//! a header, walks the resource path, runs the guards, and produces a
//! response.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Build, then serve
//! A [`VersionRegistry`](version::VersionRegistry) is mutable only while it
//! is being defined. Serving borrows it immutably, so the borrow checker
//! keeps definitions and requests apart: no locks, no globals.
//!
//! ### Inheritance by copy
//! A new version starts as a structural clone of its ancestor's graph.
//! Changing the new version never touches the old one.
//!
//! ### Fail at definition time
//! Every action is validated against its resource as soon as the resource's
//! block has run: missing strong params, missing associations, and custom
//! actions without an HTTP method are [`DefinitionError`](error::DefinitionError)s,
//! and a failed block installs nothing.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Graph ([`version`], [`resource`], [`action`])
//! - **Role**: What the API looks like, per version.
//! - **Key items**: [`VersionRegistry`](version::VersionRegistry),
//!   [`Resource`](resource::Resource), [`Action`](action::Action), and the
//!   DSL traits [`ActionDsl`](resource::ActionDsl) and
//!   [`ResourceDsl`](resource::ResourceDsl).
//!
//! ### 2. The Resolver ([`request`])
//! - **Role**: Turns an [`ApiRequest`](request::ApiRequest) into an
//!   [`Outcome`](request::Outcome): a rendered response, or an override handed
//!   back to the transport.
//! - **Key items**: [`Resolver`](request::Resolver),
//!   [`ActionContext`](request::ActionContext).
//!
//! ### 3. The Persistence Seam ([`model`], [`store`])
//! - **Role**: The engine talks to models through the [`Model`](model::Model)
//!   trait. [`store`] provides an actor-backed in-memory implementation.
//!
//! ### 4. Supporting pieces
//! [`auth`] (API tokens), [`config`], [`query`] (record filters), [`debug`]
//! (listings and route tables), [`lifecycle`] (tracing setup), and
//! [`collection`].
//!
//! ## 🚀 Quick Start
//!
//! ```rust,ignore
//! let models = Arc::new(MemoryModels::builder().model("Product").build());
//! let mut registry = VersionRegistry::new(models);
//! registry.version(1, |v| {
//!     v.resources("products", ["index", "show"])?;
//!     Ok(())
//! })?;
//!
//! let request = ApiRequest::new("index").version("1.0.0").path("products");
//! let response = Resolver::new(&registry).resolve(request).await.into_response().await;
//! ```
//!
//! ### Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod action;
pub mod auth;
pub mod collection;
pub mod config;
pub mod debug;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod query;
pub mod request;
pub mod resource;
pub mod store;
pub mod version;

pub use error::{DefinitionError, RequestError};
pub use request::{ApiRequest, Outcome, Resolver, Response, Status};
pub use version::{Version, VersionRegistry};
