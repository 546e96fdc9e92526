//! # Actions
//!
//! An [`Action`] lives on a resource or directly on a version. Default actions
//! (`index`, `show`, `create`, `update`, `destroy`) come with built-in
//! behavior; anything else is a custom action that needs an HTTP method and a
//! behavior of its own.
//!
//! At request time exactly one behavior runs, in this order of precedence:
//!
//! 1. the override body, handed back to the transport untouched,
//! 2. the replacement body, run after the guards,
//! 3. the default behavior for the action's [`ActionKind`].

mod behavior;
mod builder;
mod kind;

pub use behavior::{AccessFilter, Behavior, BehaviorResult, BoxFuture, StrongParams};
pub use builder::ActionBuilder;
pub use kind::{ActionKind, HttpMethod, DEFAULT_ACTIONS, PAGING};

use crate::collection::Named;
use crate::error::DefinitionError;
use crate::model::inflect::{pluralize, singularize};
use crate::model::Cardinality;
use crate::resource::Resource;
use std::collections::BTreeSet;
use tracing::debug;

/// Construction options for [`Action::create`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionParams {
    pub method: Option<HttpMethod>,
    pub override_: bool,
}

impl ActionParams {
    pub fn method(method: HttpMethod) -> Self {
        Self {
            method: Some(method),
            override_: false,
        }
    }

    pub fn overridden() -> Self {
        Self {
            method: None,
            override_: true,
        }
    }
}

/// The block passed to [`Action::create`].
pub enum ActionBlock {
    /// Evaluated against an [`ActionBuilder`] during construction.
    Configure(Box<dyn FnOnce(&mut ActionBuilder)>),
    /// Stored as the action (or override) body.
    Behavior(Behavior),
}

/// What an action needs to know about the resource that owns it.
#[derive(Debug, Clone, Copy)]
pub struct Owner<'a> {
    pub name: &'a str,
    pub singular: bool,
    pub strong_params: Option<&'a StrongParams>,
}

#[derive(Debug, Clone)]
pub struct Action {
    name: String,
    kind: ActionKind,
    http_method: Option<HttpMethod>,
    access_filter: Option<AccessFilter>,
    allowed: BTreeSet<String>,
    strong_params: Option<StrongParams>,
    action_body: Option<Behavior>,
    override_body: Option<Behavior>,
}

impl Action {
    /// Builds an action of the kind its name implies.
    ///
    /// A behavior block becomes the override body when `params.override_` is
    /// set and the action body otherwise. A configuration block is evaluated
    /// right away.
    pub fn create(
        name: impl Into<String>,
        params: ActionParams,
        block: Option<ActionBlock>,
    ) -> Result<Self, DefinitionError> {
        let name = name.into();
        let kind = ActionKind::from_name(&name);

        let mut builder = ActionBuilder::default();
        match block {
            Some(ActionBlock::Behavior(body)) if params.override_ => {
                builder.override_body = Some(body);
            }
            Some(ActionBlock::Behavior(body)) => builder.action_body = Some(body),
            Some(ActionBlock::Configure(configure)) => configure(&mut builder),
            None => {}
        }

        let http_method = params.method.or_else(|| kind.default_method());
        if http_method.is_none() {
            return Err(DefinitionError::MissingHttpMethod(name));
        }

        debug!(action = %name, ?kind, ?http_method, "Action created");
        Ok(Self {
            name,
            kind,
            http_method,
            access_filter: builder.access_filter,
            allowed: builder.allowed,
            strong_params: builder.strong_params,
            action_body: builder.action_body,
            override_body: builder.override_body,
        })
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn http_method(&self) -> Option<HttpMethod> {
        self.http_method
    }

    pub fn is_default(&self) -> bool {
        self.kind.is_default()
    }

    /// Whether a sub-feature such as [`PAGING`] was enabled with `allows`.
    pub fn allowed(&self, feature: &str) -> bool {
        self.allowed.contains(feature)
    }

    pub fn allowed_features(&self) -> &BTreeSet<String> {
        &self.allowed
    }

    /// Evaluates the access filter. Actions without one are open.
    pub fn permits_access(&self) -> bool {
        self.access_filter
            .as_ref()
            .map_or(true, AccessFilter::allows)
    }

    pub fn strong_params(&self) -> Option<&StrongParams> {
        self.strong_params.as_ref()
    }

    pub fn action_body(&self) -> Option<&Behavior> {
        self.action_body.as_ref()
    }

    pub fn override_body(&self) -> Option<&Behavior> {
        self.override_body.as_ref()
    }

    pub fn is_overridden(&self) -> bool {
        self.override_body.is_some()
    }

    pub fn is_replaced(&self) -> bool {
        self.action_body.is_some()
    }

    /// Checks the action against its owning resource once that resource's
    /// block has run. Missing strong params are filled in from the resource
    /// level `attributes` here.
    pub fn validate(
        &mut self,
        owner: Owner<'_>,
        parent: Option<&Resource>,
    ) -> Result<(), DefinitionError> {
        if !self.is_default() {
            return Ok(());
        }

        if let Some(parent) = parent {
            if !self.is_overridden() {
                self.check_association(owner.name, parent)?;
            }
        }

        if self.kind.requires_strong_params() && self.strong_params.is_none() {
            match owner.strong_params {
                Some(strong_params) => self.strong_params = Some(strong_params.clone()),
                None => {
                    return Err(DefinitionError::MissingAttributes {
                        action: self.name.clone(),
                        resource: owner.name.to_string(),
                    })
                }
            }
        }

        if owner.singular && parent.is_none() && !self.is_overridden() && !self.is_replaced() {
            return Err(DefinitionError::MissingBehavior {
                action: self.name.clone(),
                resource: owner.name.to_string(),
            });
        }

        Ok(())
    }

    fn check_association(&self, resource: &str, parent: &Resource) -> Result<(), DefinitionError> {
        let model = parent.model();
        let singular = singularize(resource);
        let plural = pluralize(resource);

        let (present, message) = match self.kind {
            ActionKind::Index => (
                model.has_association(&plural, Cardinality::Many),
                format!(
                    "Can't use default :{} action on `{}' without a has_many or has_and_belongs_to_many `{}' association",
                    self.name,
                    parent.name(),
                    singular
                ),
            ),
            ActionKind::Create => (
                model.has_association(&singular, Cardinality::One)
                    || model.has_association(&plural, Cardinality::Many),
                format!(
                    "Can't use default :create action on `{}' without a `{}' association",
                    parent.name(),
                    singular
                ),
            ),
            _ => (
                model.has_association(&singular, Cardinality::One),
                format!(
                    "Can't use default :{} action on `{}' without a has_one `{}' association",
                    self.name,
                    parent.name(),
                    singular
                ),
            ),
        };

        if present {
            Ok(())
        } else {
            Err(DefinitionError::MissingAssociation(message))
        }
    }
}

impl Named for Action {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(name: &str) -> Owner<'_> {
        Owner {
            name,
            singular: false,
            strong_params: None,
        }
    }

    #[test]
    fn test_custom_action_requires_http_method() {
        let err = Action::create("status", ActionParams::default(), None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "You must specify an HTTP method (get, put, post, delete) for action `status'"
        );

        let action =
            Action::create("status", ActionParams::method(HttpMethod::Get), None).unwrap();
        assert_eq!(action.kind(), ActionKind::Custom);
        assert_eq!(action.http_method(), Some(HttpMethod::Get));
    }

    #[test]
    fn test_configuration_block_is_applied() {
        let action = Action::create(
            "index",
            ActionParams::default(),
            Some(ActionBlock::Configure(Box::new(|a: &mut ActionBuilder| {
                a.allows(&[PAGING]).access_filter(|| false);
            }))),
        )
        .unwrap();

        assert!(action.allowed(PAGING));
        assert!(!action.allowed("sorting"));
        assert!(!action.permits_access());
        assert_eq!(action.http_method(), Some(HttpMethod::Get));
    }

    #[test]
    fn test_behavior_block_placement() {
        let body = Behavior::sync(|_| Ok(()));
        let replaced = Action::create(
            "show",
            ActionParams::default(),
            Some(ActionBlock::Behavior(body.clone())),
        )
        .unwrap();
        assert!(replaced.is_replaced());
        assert!(!replaced.is_overridden());

        let overridden = Action::create(
            "show",
            ActionParams::overridden(),
            Some(ActionBlock::Behavior(body)),
        )
        .unwrap();
        assert!(overridden.is_overridden());
        assert!(!overridden.is_replaced());
    }

    #[test]
    fn test_write_actions_need_strong_params() {
        let mut create = Action::create("create", ActionParams::default(), None).unwrap();
        let err = create.validate(owner("products"), None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "An attributes block was not specified for `create' action on resource `products'"
        );

        let fallback = StrongParams::new(|params| Ok(params.permit(&["title"])));
        let mut update = Action::create("update", ActionParams::default(), None).unwrap();
        update
            .validate(
                Owner {
                    strong_params: Some(&fallback),
                    ..owner("products")
                },
                None,
            )
            .unwrap();
        assert!(update.strong_params().is_some());
    }

    #[test]
    fn test_singular_top_level_needs_own_behavior() {
        let singular = Owner {
            singular: true,
            ..owner("account")
        };

        let mut show = Action::create("show", ActionParams::default(), None).unwrap();
        let err = show.validate(singular, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Can't use default :show action on singular resource `account'"
        );

        let mut replaced = Action::create(
            "show",
            ActionParams::default(),
            Some(ActionBlock::Behavior(Behavior::sync(|_| Ok(())))),
        )
        .unwrap();
        assert!(replaced.validate(singular, None).is_ok());
    }
}
