//! The state a behavior runs against.

use super::params::Params;
use super::response::{Response, Status};
use crate::action::{Action, ActionKind, StrongParams};
use crate::collection::Named;
use crate::error::RequestError;
use crate::model::inflect::singularize;
use crate::model::{Model, Record, RecordId};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// One step of the resolved resource path, root first.
#[derive(Clone)]
pub struct ResolvedResource {
    pub name: String,
    pub singular: bool,
    pub model: Arc<dyn Model>,
}

impl fmt::Debug for ResolvedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedResource")
            .field("name", &self.name)
            .field("singular", &self.singular)
            .field("model", &self.model.name())
            .finish()
    }
}

/// Request-scoped state for one action: the resolved resource chain, the
/// parsed params, and the response being built.
///
/// [`body`](Self::body) keeps the first value written;
/// [`status`](Self::status) keeps the last.
#[derive(Debug)]
pub struct ActionContext {
    action: String,
    kind: ActionKind,
    params: Params,
    chain: Vec<ResolvedResource>,
    strong_params: Option<StrongParams>,
    allowed: BTreeSet<String>,
    default_per_page: u64,
    body: Option<Value>,
    status: Status,
}

impl ActionContext {
    pub(crate) fn new(
        action: &Action,
        params: Params,
        chain: Vec<ResolvedResource>,
        default_per_page: u64,
    ) -> Self {
        Self {
            action: action.name().to_string(),
            kind: action.kind(),
            params,
            chain,
            strong_params: action.strong_params().cloned(),
            allowed: action.allowed_features().clone(),
            default_per_page,
            body: None,
            status: Status::Ok,
        }
    }

    pub fn action_name(&self) -> &str {
        &self.action
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// The resolved resource path, root first. Empty for version-level
    /// actions.
    pub fn resources(&self) -> &[ResolvedResource] {
        &self.chain
    }

    /// The resource the action belongs to.
    pub fn resource(&self) -> Option<&ResolvedResource> {
        self.chain.last()
    }

    /// The resource enclosing [`resource`](Self::resource), if nested.
    pub fn parent(&self) -> Option<&ResolvedResource> {
        self.chain.len().checked_sub(2).and_then(|i| self.chain.get(i))
    }

    pub fn model(&self) -> Option<Arc<dyn Model>> {
        self.resource().map(|r| Arc::clone(&r.model))
    }

    /// Like [`model`](Self::model), for behaviors that only make sense on a
    /// resource.
    pub fn require_model(&self) -> Result<Arc<dyn Model>, RequestError> {
        self.model().ok_or_else(|| self.no_resource())
    }

    pub fn allowed(&self, feature: &str) -> bool {
        self.allowed.contains(feature)
    }

    pub(crate) fn default_per_page(&self) -> u64 {
        self.default_per_page
    }

    /// Sets the response body unless one was already set.
    pub fn body(&mut self, value: impl Into<Value>) -> &mut Self {
        if self.body.is_none() {
            self.body = Some(value.into());
        }
        self
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    pub fn status(&mut self, status: Status) -> &mut Self {
        self.status = status;
        self
    }

    pub fn current_status(&self) -> Status {
        self.status
    }

    /// Request params filtered through the action's strong params. Actions
    /// without strong params get an empty record.
    pub fn attributes(&self) -> Result<Record, RequestError> {
        match &self.strong_params {
            Some(strong_params) => Ok(strong_params.apply(&self.params)?),
            None => Ok(Record::new()),
        }
    }

    /// Name of the `<parent>_id` param, e.g. `sale_id` under `sales`.
    pub fn parent_id_key(&self) -> Option<String> {
        self.parent().map(|p| format!("{}_id", singularize(&p.name)))
    }

    pub fn parent_resource_id(&self) -> Result<RecordId, RequestError> {
        let key = self.parent_id_key().ok_or_else(|| self.no_resource())?;
        Ok(self.params.id(&key)?)
    }

    /// The record a member action works on.
    ///
    /// Singular resources are reached through the parent's association;
    /// everything else is looked up by the `id` param.
    pub async fn record(&self) -> Result<Record, RequestError> {
        let resource = self.resource().ok_or_else(|| self.no_resource())?;
        if !resource.singular {
            let id = self.params.id("id")?;
            return Ok(resource.model.fetch(id).await?);
        }

        let parent = self.parent().ok_or_else(|| self.no_resource())?;
        let parent_id = self.parent_resource_id()?;
        parent.model.fetch(parent_id).await?;
        parent
            .model
            .related(parent_id, &resource.name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RequestError::RecordNotFound {
                resource: resource.name.clone(),
                parent: parent.model.name().to_string(),
                id: parent_id.to_string(),
            })
    }

    pub fn into_response(self) -> Response {
        Response {
            status: self.status,
            body: self.body.unwrap_or_else(|| Value::Object(Map::new())),
        }
    }

    fn no_resource(&self) -> RequestError {
        RequestError::UnknownRoute {
            path: self
                .chain
                .iter()
                .map(|r| r.name.as_str())
                .collect::<Vec<_>>()
                .join("/"),
            action: self.action.clone(),
        }
    }
}
