//! # Resources
//!
//! A [`Resource`] pairs a name with a persistent model and owns the actions it
//! responds to, plus any nested child resources. Resources are built through
//! the DSL in [`dsl`]; once a resource's block has run, every action is
//! validated against it and the resource becomes read-only.

pub mod dsl;

pub use dsl::{ActionDsl, ResourceBuilder, ResourceDsl};

use crate::action::{Action, ActionParams, Owner, StrongParams, DEFAULT_ACTIONS};
use crate::collection::{Named, ObjectCollection};
use crate::error::DefinitionError;
use crate::model::inflect::{camelize, model_name};
use crate::model::{Model, ModelResolver};
use std::sync::Arc;
use tracing::debug;

/// Which default actions a resource is seeded with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Actions {
    #[default]
    None,
    /// All five defaults.
    All,
    Only(Vec<String>),
}

impl Actions {
    fn names(&self) -> Vec<String> {
        match self {
            Actions::None => Vec::new(),
            Actions::All => DEFAULT_ACTIONS.iter().map(|name| name.to_string()).collect(),
            Actions::Only(names) => names.clone(),
        }
    }
}

impl<const N: usize> From<[&str; N]> for Actions {
    fn from(names: [&str; N]) -> Self {
        Actions::Only(names.iter().map(|name| name.to_string()).collect())
    }
}

impl From<&[&str]> for Actions {
    fn from(names: &[&str]) -> Self {
        Actions::Only(names.iter().map(|name| name.to_string()).collect())
    }
}

impl From<Vec<String>> for Actions {
    fn from(names: Vec<String>) -> Self {
        Actions::Only(names)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResourceOptions {
    pub actions: Actions,
    pub singular: bool,
}

#[derive(Debug, Clone)]
pub struct Resource {
    name: String,
    model: Arc<dyn Model>,
    singular: bool,
    parent: Option<String>,
    controller_prefix: String,
    pub(crate) actions: ObjectCollection<Action>,
    pub(crate) resources: ObjectCollection<Resource>,
    pub(crate) strong_params: Option<StrongParams>,
}

impl Resource {
    /// Builds a resource, runs `block` against it and validates the result.
    ///
    /// The model is looked up as the singular, camel-cased resource name
    /// (`sales` becomes `Sale`).
    pub fn new<F>(
        name: &str,
        options: ResourceOptions,
        parent: Option<&Resource>,
        models: &dyn ModelResolver,
        block: F,
    ) -> Result<Self, DefinitionError>
    where
        F: FnOnce(&mut ResourceBuilder<'_>) -> Result<(), DefinitionError>,
    {
        let model_name = model_name(name);
        let model = models
            .resolve(&model_name)
            .ok_or_else(|| DefinitionError::UnknownModel {
                model: model_name,
                resource: name.to_string(),
            })?;

        let controller_prefix = match parent {
            Some(parent) => format!("{}{}", parent.controller_prefix, camelize(name)),
            None => camelize(name),
        };

        let mut resource = Resource {
            name: name.to_string(),
            model,
            singular: options.singular,
            parent: parent.map(|p| p.name.clone()),
            controller_prefix,
            actions: ObjectCollection::new(),
            resources: ObjectCollection::new(),
            strong_params: None,
        };

        for action in options.actions.names() {
            resource
                .actions
                .add(Action::create(action, ActionParams::default(), None)?);
        }

        block(&mut ResourceBuilder::new(&mut resource, models))?;

        let owner_params = resource.strong_params.clone();
        for action in resource.actions.iter_mut() {
            let owner = Owner {
                name: &resource.name,
                singular: resource.singular,
                strong_params: owner_params.as_ref(),
            };
            action.validate(owner, parent)?;
        }

        if resource.strong_params.is_some()
            && !resource.actions.contains("create")
            && !resource.actions.contains("update")
        {
            return Err(DefinitionError::AttributesWithoutWriteAction);
        }

        debug!(
            resource = %resource.name,
            prefix = %resource.controller_prefix,
            actions = ?resource.actions.names(),
            "Resource defined"
        );
        Ok(resource)
    }

    pub fn model(&self) -> &Arc<dyn Model> {
        &self.model
    }

    pub fn is_singular(&self) -> bool {
        self.singular
    }

    /// Name of the enclosing resource, if nested.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Camel-cased chain of names from the root, e.g. `ProductsSales`.
    pub fn controller_prefix(&self) -> &str {
        &self.controller_prefix
    }

    pub fn actions(&self) -> &ObjectCollection<Action> {
        &self.actions
    }

    pub fn action(&self, name: &str) -> Option<&Action> {
        self.actions.find(name)
    }

    pub fn resources(&self) -> &ObjectCollection<Resource> {
        &self.resources
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.find(name)
    }

    pub fn strong_params(&self) -> Option<&StrongParams> {
        self.strong_params.as_ref()
    }

    pub fn default_actions(&self) -> Vec<&Action> {
        self.actions.iter().filter(|a| a.is_default()).collect()
    }

    pub fn custom_actions(&self) -> Vec<&Action> {
        self.actions.iter().filter(|a| !a.is_default()).collect()
    }

    /// Folds a re-declaration of this resource into it.
    pub(crate) fn merge(&mut self, other: Resource) {
        for action in other.actions {
            self.actions.upsert(action);
        }
        for child in other.resources {
            match self.resources.find_mut(child.name()) {
                Some(existing) => existing.merge(child),
                None => {
                    self.resources.add(child);
                }
            }
        }
        if other.strong_params.is_some() {
            self.strong_params = other.strong_params;
        }
    }
}

impl Named for Resource {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Behavior, HttpMethod};
    use crate::store::MemoryModels;

    fn models() -> MemoryModels {
        MemoryModels::builder()
            .model("Product")
            .model("Sale")
            .model("Payment")
            .has_many("Product", "sales", "Sale")
            .has_one("Sale", "payment", "Payment")
            .build()
    }

    fn no_block(_: &mut ResourceBuilder<'_>) -> Result<(), DefinitionError> {
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_model_is_rejected() {
        let models = models();
        let err = Resource::new("boxes", ResourceOptions::default(), None, &models, no_block)
            .unwrap_err();
        assert!(err.is_unknown_resource());
        assert_eq!(
            err.to_string(),
            "Could not find constant `Box' for resource `boxes'"
        );
    }

    #[tokio::test]
    async fn test_actions_all_seeds_defaults() {
        let models = models();
        let resource = Resource::new(
            "products",
            ResourceOptions {
                actions: Actions::All,
                singular: false,
            },
            None,
            &models,
            |r| {
                r.attributes(|params| Ok(params.require("product")?.permit(&["title"])));
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(resource.model().name(), "Product");
        assert_eq!(resource.controller_prefix(), "Products");
        assert_eq!(
            resource.actions().names(),
            vec!["index", "show", "create", "update", "destroy"]
        );
        assert!(resource.action("create").unwrap().strong_params().is_some());
    }

    #[tokio::test]
    async fn test_attributes_without_write_action() {
        let models = models();
        let err = Resource::new(
            "products",
            ResourceOptions {
                actions: ["index"].into(),
                singular: false,
            },
            None,
            &models,
            |r| {
                r.attributes(|params| Ok(params.permit(&["title"])));
                Ok(())
            },
        )
        .unwrap_err();
        assert!(err.is_unknown_action());
        assert_eq!(
            err.to_string(),
            "An attributes block was specified without a :create or :update action"
        );
    }

    #[tokio::test]
    async fn test_nested_resources_check_associations() {
        let models = models();
        let products = Resource::new(
            "products",
            ResourceOptions::default(),
            None,
            &models,
            |r| {
                r.resources("sales", ["index"])?;
                Ok(())
            },
        )
        .unwrap();
        let sales = products.resource("sales").unwrap();
        assert_eq!(sales.parent(), Some("products"));
        assert_eq!(sales.controller_prefix(), "ProductsSales");

        let err = Resource::new(
            "products",
            ResourceOptions::default(),
            None,
            &models,
            |r| {
                r.resources("sales", ["show"])?;
                Ok(())
            },
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Can't use default :show action on `products' without a has_one `sale' association"
        );

        let err = Resource::new(
            "sales",
            ResourceOptions::default(),
            None,
            &models,
            |r| {
                r.resources("payments", ["index"])?;
                Ok(())
            },
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Can't use default :index action on `sales' without a has_many or has_and_belongs_to_many `payment' association"
        );
    }

    #[tokio::test]
    async fn test_overridden_nested_action_skips_association_check() {
        let models = models();
        let products = Resource::new(
            "products",
            ResourceOptions::default(),
            None,
            &models,
            |r| {
                r.resources_with("sales", Actions::None, |s| {
                    s.override_action("show", Behavior::sync(|_| Ok(())))?;
                    Ok(())
                })?;
                Ok(())
            },
        )
        .unwrap();
        assert!(products.resource("sales").unwrap().action("show").unwrap().is_overridden());
    }

    #[tokio::test]
    async fn test_duplicate_child_merges_actions() {
        let models = models();
        let products = Resource::new(
            "products",
            ResourceOptions::default(),
            None,
            &models,
            |r| {
                r.resources("sales", ["index"])?;
                r.resources_with("sales", Actions::None, |s| {
                    s.get("recent", Behavior::sync(|_| Ok(())))?;
                    Ok(())
                })?;
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(products.resources().len(), 1);
        let sales = products.resource("sales").unwrap();
        assert_eq!(sales.actions().names(), vec!["index", "recent"]);
        assert_eq!(sales.default_actions().len(), 1);
        assert_eq!(
            sales.custom_actions()[0].http_method(),
            Some(HttpMethod::Get)
        );
    }
}
