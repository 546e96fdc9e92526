//! # Definition DSL
//!
//! Two traits carry the declaration vocabulary shared by versions and
//! resources:
//!
//! - [`ActionDsl`]: declares actions in the current scope.
//! - [`ResourceDsl`]: declares (and removes) child resources.
//!
//! Implementors only provide access to their collections; every declaration
//! method is a provided method. All declarations return `Result` so blocks can
//! chain them with `?`:
//!
//! ```ignore
//! registry.version(1, |v| {
//!     v.resources_with("products", Actions::All, |r| {
//!         r.attributes(|params| Ok(params.require("product")?.permit(&["title", "cost"])));
//!         r.resources("sales", ["index"])?;
//!         Ok(())
//!     })?;
//!     v.get("status", Behavior::sync(|ctx| { ctx.body("ok"); Ok(()) }))?;
//!     Ok(())
//! })?;
//! ```

use super::{Actions, Resource, ResourceOptions};
use crate::action::{Action, ActionBlock, ActionBuilder, ActionParams, Behavior, HttpMethod, StrongParams};
use crate::collection::{Named, ObjectCollection};
use crate::error::DefinitionError;
use crate::model::{ModelResolver, Record};
use crate::request::params::{ParameterMissing, Params};
use tracing::debug;

/// Declares actions in a version or resource scope.
pub trait ActionDsl {
    fn actions_mut(&mut self) -> &mut ObjectCollection<Action>;

    /// The general form every other declaration goes through.
    fn action_with_params(
        &mut self,
        name: &str,
        params: ActionParams,
        block: Option<ActionBlock>,
    ) -> Result<&mut Self, DefinitionError>
    where
        Self: Sized,
    {
        let action = Action::create(name, params, block)?;
        self.actions_mut().upsert(action);
        Ok(self)
    }

    /// A default action with its built-in behavior.
    fn action(&mut self, name: &str) -> Result<&mut Self, DefinitionError>
    where
        Self: Sized,
    {
        self.action_with_params(name, ActionParams::default(), None)
    }

    /// A default action configured through an [`ActionBuilder`].
    fn action_with<F>(&mut self, name: &str, configure: F) -> Result<&mut Self, DefinitionError>
    where
        Self: Sized,
        F: FnOnce(&mut ActionBuilder) + 'static,
    {
        let block = ActionBlock::Configure(Box::new(configure));
        self.action_with_params(name, ActionParams::default(), Some(block))
    }

    fn custom_action(
        &mut self,
        name: &str,
        method: HttpMethod,
        body: Behavior,
    ) -> Result<&mut Self, DefinitionError>
    where
        Self: Sized,
    {
        self.action_with_params(
            name,
            ActionParams::method(method),
            Some(ActionBlock::Behavior(body)),
        )
    }

    fn get(&mut self, name: &str, body: Behavior) -> Result<&mut Self, DefinitionError>
    where
        Self: Sized,
    {
        self.custom_action(name, HttpMethod::Get, body)
    }

    fn post(&mut self, name: &str, body: Behavior) -> Result<&mut Self, DefinitionError>
    where
        Self: Sized,
    {
        self.custom_action(name, HttpMethod::Post, body)
    }

    fn put(&mut self, name: &str, body: Behavior) -> Result<&mut Self, DefinitionError>
    where
        Self: Sized,
    {
        self.custom_action(name, HttpMethod::Put, body)
    }

    fn delete(&mut self, name: &str, body: Behavior) -> Result<&mut Self, DefinitionError>
    where
        Self: Sized,
    {
        self.custom_action(name, HttpMethod::Delete, body)
    }

    /// A default action whose behavior is swapped out. Guards still apply.
    fn replace_action(&mut self, name: &str, body: Behavior) -> Result<&mut Self, DefinitionError>
    where
        Self: Sized,
    {
        self.action_with(name, move |a| {
            a.replace(body);
        })
    }

    /// An action handed to the transport as-is, bypassing guards and default
    /// rendering.
    fn override_action(&mut self, name: &str, body: Behavior) -> Result<&mut Self, DefinitionError>
    where
        Self: Sized,
    {
        self.action_with_params(
            name,
            ActionParams::overridden(),
            Some(ActionBlock::Behavior(body)),
        )
    }
}

/// Declares child resources.
pub trait ResourceDsl {
    fn models(&self) -> &dyn ModelResolver;

    /// The resource new children are nested under, if any.
    fn parent_resource(&self) -> Option<&Resource>;

    fn resources_mut(&mut self) -> &mut ObjectCollection<Resource>;

    /// Builds a child and adds it, merging into an existing child of the same
    /// name.
    fn add_resource<F>(
        &mut self,
        name: &str,
        options: ResourceOptions,
        block: F,
    ) -> Result<&mut Self, DefinitionError>
    where
        Self: Sized,
        F: FnOnce(&mut ResourceBuilder<'_>) -> Result<(), DefinitionError>,
    {
        let child = Resource::new(name, options, self.parent_resource(), self.models(), block)?;
        let resources = self.resources_mut();
        match resources.find_mut(name) {
            Some(existing) => {
                debug!(resource = %name, "Merging re-declared resource");
                existing.merge(child);
            }
            None => {
                resources.add(child);
            }
        }
        Ok(self)
    }

    /// A plural resource (`products`) with the given default actions.
    fn resources(&mut self, name: &str, actions: impl Into<Actions>) -> Result<&mut Self, DefinitionError>
    where
        Self: Sized,
    {
        self.resources_with(name, actions, |_| Ok(()))
    }

    fn resources_with<F>(
        &mut self,
        name: &str,
        actions: impl Into<Actions>,
        block: F,
    ) -> Result<&mut Self, DefinitionError>
    where
        Self: Sized,
        F: FnOnce(&mut ResourceBuilder<'_>) -> Result<(), DefinitionError>,
    {
        let options = ResourceOptions {
            actions: actions.into(),
            singular: false,
        };
        self.add_resource(name, options, block)
    }

    /// A singular resource (`payment`), addressed through its parent.
    fn resource(&mut self, name: &str, actions: impl Into<Actions>) -> Result<&mut Self, DefinitionError>
    where
        Self: Sized,
    {
        self.resource_with(name, actions, |_| Ok(()))
    }

    fn resource_with<F>(
        &mut self,
        name: &str,
        actions: impl Into<Actions>,
        block: F,
    ) -> Result<&mut Self, DefinitionError>
    where
        Self: Sized,
        F: FnOnce(&mut ResourceBuilder<'_>) -> Result<(), DefinitionError>,
    {
        let options = ResourceOptions {
            actions: actions.into(),
            singular: true,
        };
        self.add_resource(name, options, block)
    }

    fn remove_resource(&mut self, names: &[&str]) -> Result<&mut Self, DefinitionError>
    where
        Self: Sized,
    {
        let resources = self.resources_mut();
        for name in names {
            if resources.delete(name).is_none() {
                return Err(DefinitionError::UnknownResource(name.to_string()));
            }
        }
        Ok(self)
    }
}

/// The scope a resource block runs in.
pub struct ResourceBuilder<'a> {
    resource: &'a mut Resource,
    models: &'a dyn ModelResolver,
}

impl<'a> ResourceBuilder<'a> {
    pub(crate) fn new(resource: &'a mut Resource, models: &'a dyn ModelResolver) -> Self {
        Self { resource, models }
    }

    pub fn name(&self) -> &str {
        self.resource.name()
    }

    /// Resource-level strong params, used by `create` and `update` actions
    /// that declare none of their own.
    pub fn attributes(
        &mut self,
        f: impl Fn(&Params) -> Result<Record, ParameterMissing> + Send + Sync + 'static,
    ) -> &mut Self {
        self.resource.strong_params = Some(StrongParams::new(f));
        self
    }
}

impl ActionDsl for ResourceBuilder<'_> {
    fn actions_mut(&mut self) -> &mut ObjectCollection<Action> {
        &mut self.resource.actions
    }
}

impl ResourceDsl for ResourceBuilder<'_> {
    fn models(&self) -> &dyn ModelResolver {
        self.models
    }

    fn parent_resource(&self) -> Option<&Resource> {
        Some(&*self.resource)
    }

    fn resources_mut(&mut self) -> &mut ObjectCollection<Resource> {
        &mut self.resource.resources
    }
}
