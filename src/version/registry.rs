use super::{Version, VersionBuilder, VersionInput, VersionNumber};
use crate::auth::CredentialValidator;
use crate::config::ApiConfig;
use crate::error::DefinitionError;
use crate::model::ModelResolver;
use crate::resource::{Actions, ResourceBuilder, ResourceDsl};
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument};

/// Every version of an API, in the order they were first defined.
///
/// The registry is built once (it needs `&mut self`) and then only read by a
/// [`Resolver`](crate::request::Resolver), which borrows it immutably for as
/// long as requests are being served.
pub struct VersionRegistry {
    versions: Vec<Version>,
    models: Arc<dyn ModelResolver>,
    config: ApiConfig,
    validator: Option<Arc<dyn CredentialValidator>>,
}

impl VersionRegistry {
    pub fn new(models: Arc<dyn ModelResolver>) -> Self {
        Self::with_config(models, ApiConfig::default())
    }

    pub fn with_config(models: Arc<dyn ModelResolver>, config: ApiConfig) -> Self {
        Self {
            versions: Vec::new(),
            models,
            config,
            validator: None,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Runs an API definition block. If the block fails, every version it
    /// defined or extended is rolled back.
    pub fn define<F>(&mut self, block: F) -> Result<&mut Self, DefinitionError>
    where
        F: FnOnce(&mut ApiBuilder<'_>) -> Result<(), DefinitionError>,
    {
        let snapshot = self.versions.clone();
        if let Err(err) = block(&mut ApiBuilder { registry: self }) {
            self.versions = snapshot;
            return Err(err);
        }
        Ok(self)
    }

    /// Defines a version, or re-opens it if the number is already known.
    ///
    /// A new version starts as a copy of the last registered one. The block
    /// runs against a working copy that only replaces (or joins) the registry
    /// once the block succeeds.
    #[instrument(skip(self, number, block), fields(version))]
    pub fn version<F>(
        &mut self,
        number: impl Into<VersionInput>,
        block: F,
    ) -> Result<&Version, DefinitionError>
    where
        F: FnOnce(&mut VersionBuilder<'_>) -> Result<(), DefinitionError>,
    {
        let number = VersionNumber::parse(number)?;
        tracing::Span::current().record("version", number.as_str());

        let existing = self.versions.iter().position(|v| v.number() == &number);
        let mut version = match existing {
            Some(index) => self.versions[index].clone(),
            None => Version::new(number, self.versions.last()),
        };

        block(&mut VersionBuilder::new(&mut version, self.models.as_ref()))?;

        let index = match existing {
            Some(index) => {
                self.versions[index] = version;
                index
            }
            None => {
                info!(
                    ancestor = ?version.ancestor().map(VersionNumber::as_str),
                    resources = version.resources().len(),
                    "Version defined"
                );
                self.versions.push(version);
                self.versions.len() - 1
            }
        };
        Ok(&self.versions[index])
    }

    /// Exact match on the normalized number. Unparseable numbers find nothing.
    pub fn find(&self, number: impl Into<VersionInput>) -> Option<&Version> {
        let number = VersionNumber::parse(number).ok()?;
        self.versions.iter().find(|v| v.number() == &number)
    }

    pub fn exists(&self, number: impl Into<VersionInput>) -> bool {
        self.find(number).is_some()
    }

    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    /// Makes every request present a credential `validator` accepts.
    pub fn require_tokens(&mut self, validator: Arc<dyn CredentialValidator>) -> &mut Self {
        info!("API tokens required");
        self.validator = Some(validator);
        self
    }

    pub fn tokens_required(&self) -> bool {
        self.validator.is_some()
    }

    pub fn credential_validator(&self) -> Option<&Arc<dyn CredentialValidator>> {
        self.validator.as_ref()
    }

    /// Forgets every version and the token requirement.
    pub fn reset(&mut self) {
        self.versions.clear();
        self.validator = None;
    }
}

impl fmt::Debug for VersionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionRegistry")
            .field("versions", &self.versions)
            .field("config", &self.config)
            .field("tokens_required", &self.tokens_required())
            .finish()
    }
}

/// The scope of [`VersionRegistry::define`].
///
/// Resources declared here, outside any `version` block, land on version
/// `1.0.0`.
pub struct ApiBuilder<'a> {
    registry: &'a mut VersionRegistry,
}

impl ApiBuilder<'_> {
    pub fn version<F>(
        &mut self,
        number: impl Into<VersionInput>,
        block: F,
    ) -> Result<&mut Self, DefinitionError>
    where
        F: FnOnce(&mut VersionBuilder<'_>) -> Result<(), DefinitionError>,
    {
        self.registry.version(number, block)?;
        Ok(self)
    }

    pub fn resources(&mut self, name: &str, actions: impl Into<Actions>) -> Result<&mut Self, DefinitionError> {
        self.resources_with(name, actions, |_| Ok(()))
    }

    pub fn resources_with<F>(
        &mut self,
        name: &str,
        actions: impl Into<Actions>,
        block: F,
    ) -> Result<&mut Self, DefinitionError>
    where
        F: FnOnce(&mut ResourceBuilder<'_>) -> Result<(), DefinitionError>,
    {
        let actions = actions.into();
        self.version(1, |v| {
            v.resources_with(name, actions, block)?;
            Ok(())
        })
    }

    pub fn resource(&mut self, name: &str, actions: impl Into<Actions>) -> Result<&mut Self, DefinitionError> {
        self.resource_with(name, actions, |_| Ok(()))
    }

    pub fn resource_with<F>(
        &mut self,
        name: &str,
        actions: impl Into<Actions>,
        block: F,
    ) -> Result<&mut Self, DefinitionError>
    where
        F: FnOnce(&mut ResourceBuilder<'_>) -> Result<(), DefinitionError>,
    {
        let actions = actions.into();
        self.version(1, |v| {
            v.resource_with(name, actions, block)?;
            Ok(())
        })
    }

    pub fn require_tokens(&mut self, validator: Arc<dyn CredentialValidator>) -> &mut Self {
        self.registry.require_tokens(validator);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Behavior;
    use crate::resource::ActionDsl;
    use crate::store::MemoryModels;

    fn registry() -> VersionRegistry {
        let models = MemoryModels::builder()
            .model("Product")
            .model("Sale")
            .has_many("Product", "sales", "Sale")
            .build();
        VersionRegistry::new(Arc::new(models))
    }

    #[tokio::test]
    async fn test_new_version_copies_its_ancestor() {
        let mut registry = registry();
        registry
            .version(1, |v| {
                v.resources("products", Actions::All)?;
                Ok(())
            })
            .unwrap_err();

        registry
            .version(1, |v| {
                v.resources_with("products", ["index", "show"], |_| Ok(()))?;
                v.get("status", Behavior::sync(|_| Ok(())))?;
                Ok(())
            })
            .unwrap();
        let v2 = registry
            .version(1.5, |v| {
                v.resources("sales", ["index"])?;
                Ok(())
            })
            .unwrap();

        assert_eq!(v2.ancestor().map(VersionNumber::as_str), Some("1.0.0"));
        assert!(v2.has_action("products", "show"));
        assert!(v2.has_resource("sales"));
        assert_eq!(v2.custom_actions().len(), 1);
        assert!(!registry.find("1.0.0").unwrap().has_resource("sales"));
    }

    #[tokio::test]
    async fn test_removals_do_not_touch_the_ancestor() {
        let mut registry = registry();
        registry
            .define(|api| {
                api.version(1, |v| {
                    v.resources("products", ["index", "show"])?;
                    v.get("status", Behavior::sync(|_| Ok(())))?;
                    Ok(())
                })?;
                api.version(2, |v| {
                    v.remove_action(&["status"])?;
                    v.remove_action_from(&["show"], "products")?;
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap();

        let v1 = registry.find(1).unwrap();
        let v2 = registry.find("2").unwrap();
        assert!(v1.has_action("products", "show"));
        assert!(v1.actions().contains("status"));
        assert!(!v2.has_action("products", "show"));
        assert!(v2.has_action("products", "index"));
        assert!(v2.actions().is_empty());
    }

    #[tokio::test]
    async fn test_removal_errors() {
        let mut registry = registry();
        registry
            .version(1, |v| {
                v.resources("products", ["index"])?;
                Ok(())
            })
            .unwrap();

        let err = registry
            .version(2, |v| {
                v.remove_action(&["status"])?;
                Ok(())
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown action `status' on ancestor version 1.0.0");

        let err = registry
            .version(2, |v| {
                v.remove_action_from(&["index"], "sales")?;
                Ok(())
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown resource `sales' on ancestor version 1.0.0");

        let err = registry
            .version(2, |v| {
                v.remove_action_from(&["show"], "products")?;
                Ok(())
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown action `show' on resource `products'");

        let err = registry
            .version(2, |v| {
                v.remove_resource(&["sales"])?;
                Ok(())
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown resource `sales'");

        assert_eq!(registry.versions().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_define_rolls_back() {
        let mut registry = registry();
        let err = registry
            .define(|api| {
                api.resources("products", ["index"])?;
                api.version(2, |v| {
                    v.resources("boxes", ["index"])?;
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap_err();
        assert!(err.is_unknown_resource());
        assert!(registry.versions().is_empty());
    }

    #[tokio::test]
    async fn test_top_level_resources_land_on_version_one() {
        let mut registry = registry();
        registry
            .define(|api| {
                api.resources("products", ["index"])?;
                Ok(())
            })
            .unwrap();
        assert!(registry.find("1.0.0").unwrap().has_action("products", "index"));
        assert!(registry.exists(1.0));
        assert!(!registry.exists("1.x"));
    }

    #[tokio::test]
    async fn test_reset_clears_versions_and_tokens() {
        let mut registry = registry();
        registry.require_tokens(Arc::new(|_: &str| true));
        registry.version(1, |_| Ok(())).unwrap();
        assert!(registry.tokens_required());

        registry.reset();
        assert!(registry.versions().is_empty());
        assert!(!registry.tokens_required());
    }
}
