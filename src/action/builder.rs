use super::behavior::{AccessFilter, Behavior, StrongParams};
use crate::model::Record;
use crate::request::params::{ParameterMissing, Params};
use std::collections::BTreeSet;

/// Configuration surface handed to an action's configuration block.
///
/// ```ignore
/// resource.action_with("index", |a| {
///     a.allows(&["paging"]);
///     a.access_filter(|| true);
/// })?;
/// ```
#[derive(Debug, Default)]
pub struct ActionBuilder {
    pub(super) access_filter: Option<AccessFilter>,
    pub(super) allowed: BTreeSet<String>,
    pub(super) strong_params: Option<StrongParams>,
    pub(super) action_body: Option<Behavior>,
    pub(super) override_body: Option<Behavior>,
}

impl ActionBuilder {
    /// Requests are rejected as unauthorized while `filter` returns false.
    pub fn access_filter(&mut self, filter: impl Fn() -> bool + Send + Sync + 'static) -> &mut Self {
        self.access_filter = Some(AccessFilter::new(filter));
        self
    }

    /// Enables sub-features such as [`PAGING`](super::PAGING).
    pub fn allows(&mut self, features: &[&str]) -> &mut Self {
        self.allowed
            .extend(features.iter().map(|feature| feature.to_string()));
        self
    }

    /// Strong params for this action only.
    pub fn attributes(
        &mut self,
        f: impl Fn(&Params) -> Result<Record, ParameterMissing> + Send + Sync + 'static,
    ) -> &mut Self {
        self.strong_params = Some(StrongParams::new(f));
        self
    }

    /// Swaps the default behavior out while keeping guards in place.
    pub fn replace(&mut self, body: Behavior) -> &mut Self {
        self.action_body = Some(body);
        self
    }

    /// Hands the whole request to `body`, to be run by the transport.
    pub fn override_with(&mut self, body: Behavior) -> &mut Self {
        self.override_body = Some(body);
        self
    }
}
