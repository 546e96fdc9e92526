//! # Versions
//!
//! A [`Version`] is one SemVer-numbered release of the API: a set of
//! resources plus top-level custom actions. Each new version starts as a deep
//! copy of the version registered before it and then applies its own block,
//! so it can add, extend or remove things without touching its ancestor.

pub mod number;
pub mod registry;

pub use number::{VersionInput, VersionNumber};
pub use registry::{ApiBuilder, VersionRegistry};

use crate::action::Action;
use crate::collection::{Named, ObjectCollection};
use crate::error::DefinitionError;
use crate::model::ModelResolver;
use crate::resource::{ActionDsl, Resource, ResourceDsl};

#[derive(Debug, Clone)]
pub struct Version {
    version: VersionNumber,
    ancestor: Option<VersionNumber>,
    resources: ObjectCollection<Resource>,
    actions: ObjectCollection<Action>,
}

impl Version {
    /// An empty version, or a copy of `ancestor`'s graph.
    pub(crate) fn new(version: VersionNumber, ancestor: Option<&Version>) -> Self {
        match ancestor {
            Some(ancestor) => Self {
                version,
                ancestor: Some(ancestor.version.clone()),
                resources: ancestor.resources.clone(),
                actions: ancestor.actions.clone(),
            },
            None => Self {
                version,
                ancestor: None,
                resources: ObjectCollection::new(),
                actions: ObjectCollection::new(),
            },
        }
    }

    pub fn number(&self) -> &VersionNumber {
        &self.version
    }

    /// The version this one was copied from.
    pub fn ancestor(&self) -> Option<&VersionNumber> {
        self.ancestor.as_ref()
    }

    pub fn resources(&self) -> &ObjectCollection<Resource> {
        &self.resources
    }

    /// Top-level actions, not attached to any resource.
    pub fn actions(&self) -> &ObjectCollection<Action> {
        &self.actions
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.find(name)
    }

    pub fn has_resource(&self, name: &str) -> bool {
        self.resources.contains(name)
    }

    /// Whether `resource` is defined here and responds to `action`.
    pub fn has_action(&self, resource: &str, action: &str) -> bool {
        self.resource(resource)
            .is_some_and(|r| r.actions().contains(action))
    }

    pub fn default_actions(&self) -> Vec<&Action> {
        self.actions.iter().filter(|a| a.is_default()).collect()
    }

    pub fn custom_actions(&self) -> Vec<&Action> {
        self.actions.iter().filter(|a| !a.is_default()).collect()
    }

    /// Version named in "on ancestor version" errors.
    fn ancestor_label(&self) -> String {
        self.ancestor.as_ref().unwrap_or(&self.version).to_string()
    }
}

impl Named for Version {
    fn name(&self) -> &str {
        self.version.as_str()
    }
}

/// The scope a version block runs in.
///
/// Besides the resource and action DSL, a version block can remove whatever
/// it inherited that it no longer wants.
pub struct VersionBuilder<'a> {
    version: &'a mut Version,
    models: &'a dyn ModelResolver,
}

impl<'a> VersionBuilder<'a> {
    pub(crate) fn new(version: &'a mut Version, models: &'a dyn ModelResolver) -> Self {
        Self { version, models }
    }

    pub fn number(&self) -> &VersionNumber {
        &self.version.version
    }

    /// Drops inherited top-level actions.
    pub fn remove_action(&mut self, names: &[&str]) -> Result<&mut Self, DefinitionError> {
        for name in names {
            if self.version.actions.delete(name).is_none() {
                return Err(DefinitionError::UnknownAncestorAction {
                    action: name.to_string(),
                    version: self.version.ancestor_label(),
                });
            }
        }
        Ok(self)
    }

    /// Drops inherited actions from one resource.
    pub fn remove_action_from(
        &mut self,
        names: &[&str],
        resource: &str,
    ) -> Result<&mut Self, DefinitionError> {
        let label = self.version.ancestor_label();
        let target = self.version.resources.find_mut(resource).ok_or_else(|| {
            DefinitionError::UnknownAncestorResource {
                resource: resource.to_string(),
                version: label,
            }
        })?;

        for name in names {
            if target.actions.delete(name).is_none() {
                return Err(DefinitionError::UnknownAction {
                    action: name.to_string(),
                    resource: resource.to_string(),
                });
            }
        }
        Ok(self)
    }
}

impl ActionDsl for VersionBuilder<'_> {
    fn actions_mut(&mut self) -> &mut ObjectCollection<Action> {
        &mut self.version.actions
    }
}

impl ResourceDsl for VersionBuilder<'_> {
    fn models(&self) -> &dyn ModelResolver {
        self.models
    }

    fn parent_resource(&self) -> Option<&Resource> {
        None
    }

    fn resources_mut(&mut self) -> &mut ObjectCollection<Resource> {
        &mut self.version.resources
    }
}
