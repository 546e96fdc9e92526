//! Stored callbacks: behaviors, access filters and strong params.
//!
//! Each is a shared, immutable closure. Cloning one (for example when a new
//! version copies its ancestor's graph) clones the `Arc`, never the closure.

use crate::error::RequestError;
use crate::model::Record;
use crate::request::context::ActionContext;
use crate::request::params::{ParameterMissing, Params};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a behavior returns. Errors become error responses.
pub type BehaviorResult = Result<(), RequestError>;

type BehaviorFn =
    dyn for<'c> Fn(&'c mut ActionContext) -> BoxFuture<'c, BehaviorResult> + Send + Sync;

/// Replacement, custom or override logic for an action.
///
/// Behaviors receive the [`ActionContext`] and set the outcome through
/// [`ActionContext::body`] and [`ActionContext::status`].
///
/// ```ignore
/// let latest = Behavior::new(|ctx| Box::pin(async move {
///     let model = ctx.require_model()?;
///     let records = model.all().await?;
///     ctx.body(records.last().cloned());
///     Ok(())
/// }));
/// ```
#[derive(Clone)]
pub struct Behavior(Arc<BehaviorFn>);

impl Behavior {
    pub fn new<F>(f: F) -> Self
    where
        F: for<'c> Fn(&'c mut ActionContext) -> BoxFuture<'c, BehaviorResult>
            + Send
            + Sync
            + 'static,
    {
        Self(Arc::new(f))
    }

    /// A behavior that does not need to await anything.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&mut ActionContext) -> BehaviorResult + Send + Sync + 'static,
    {
        Self::new(move |ctx| {
            let result = f(ctx);
            Box::pin(std::future::ready(result))
        })
    }

    pub async fn call(&self, ctx: &mut ActionContext) -> BehaviorResult {
        (self.0)(ctx).await
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Behavior(..)")
    }
}

/// Zero-argument allow/deny predicate.
#[derive(Clone)]
pub struct AccessFilter(Arc<dyn Fn() -> bool + Send + Sync>);

impl AccessFilter {
    pub fn new(f: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn allows(&self) -> bool {
        (self.0)()
    }
}

impl fmt::Debug for AccessFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessFilter(..)")
    }
}

/// Whitelists request input into a record.
///
/// ```ignore
/// StrongParams::new(|params| Ok(params.require("product")?.permit(&["title"])))
/// ```
#[derive(Clone)]
pub struct StrongParams(
    Arc<dyn Fn(&Params) -> Result<Record, ParameterMissing> + Send + Sync>,
);

impl StrongParams {
    pub fn new(
        f: impl Fn(&Params) -> Result<Record, ParameterMissing> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    pub fn apply(&self, params: &Params) -> Result<Record, ParameterMissing> {
        (self.0)(params)
    }
}

impl fmt::Debug for StrongParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StrongParams(..)")
    }
}
