//! # Request Resolution
//!
//! The [`Resolver`] takes one [`ApiRequest`] (version header, resource path,
//! action name, params, optional token) and walks the version graph:
//!
//! 1. token check, when the registry requires tokens
//! 2. version lookup
//! 3. resource chain, segment by segment
//! 4. action lookup on the last resource (or the version, for an empty path)
//! 5. access filter
//! 6. dispatch: override, replacement, or the default behavior
//!
//! Every failure along the way becomes a [`Response`]; nothing escapes as an
//! error. Overridden actions are not run here: they come back as
//! [`Outcome::Deferred`] for the transport to execute in its own context.

pub mod context;
pub mod defaults;
pub mod params;
pub mod response;

pub use context::{ActionContext, ResolvedResource};
pub use params::{ParameterMissing, Params};
pub use response::{Response, Status};

use crate::action::{Action, Behavior};
use crate::collection::Named;
use crate::error::RequestError;
use crate::resource::Resource;
use crate::version::{Version, VersionRegistry};
use tracing::{debug, info, instrument, warn};

/// A transport-neutral request.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    /// Raw value of the version header, if sent.
    pub version: Option<String>,
    /// Resource names from the root, e.g. `["products", "sales"]`.
    pub resource_path: Vec<String>,
    pub action: String,
    pub params: Params,
    pub token: Option<String>,
}

impl ApiRequest {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the resource path from a `/`-separated string such as
    /// `"products/sales"`. Empty segments are ignored.
    pub fn path(mut self, path: &str) -> Self {
        self.resource_path = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    pub fn params(mut self, params: impl Into<Params>) -> Self {
        self.params = params.into();
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// What the transport should do with a request.
#[derive(Debug)]
pub enum Outcome {
    /// Render this response.
    Rendered(Response),
    /// Run this behavior in the transport's own request context.
    Deferred(CustomLogic),
}

impl Outcome {
    /// The rendered response, or `None` if the outcome is deferred.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Outcome::Rendered(response) => Some(response),
            Outcome::Deferred(_) => None,
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Outcome::Deferred(_))
    }

    /// Produces a response, running deferred logic if needed.
    pub async fn into_response(self) -> Response {
        match self {
            Outcome::Rendered(response) => response,
            Outcome::Deferred(logic) => logic.run().await,
        }
    }
}

/// An override body together with the context it should run against.
#[derive(Debug)]
pub struct CustomLogic {
    behavior: Behavior,
    context: ActionContext,
}

impl CustomLogic {
    pub fn context(&self) -> &ActionContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ActionContext {
        &mut self.context
    }

    pub async fn run(mut self) -> Response {
        match self.behavior.call(&mut self.context).await {
            Ok(()) => self.context.into_response(),
            Err(err) => error_response(&err),
        }
    }
}

/// Resolves requests against a registry.
///
/// Holds the registry by shared reference, so the registry cannot change
/// while requests are being served.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'r> {
    registry: &'r VersionRegistry,
}

impl<'r> Resolver<'r> {
    pub fn new(registry: &'r VersionRegistry) -> Self {
        Self { registry }
    }

    #[instrument(
        skip(self, request),
        fields(
            version = request.version.as_deref().unwrap_or("-"),
            path = %request.resource_path.join("/"),
            action = %request.action,
        )
    )]
    pub async fn resolve(&self, request: ApiRequest) -> Outcome {
        match self.dispatch(request).await {
            Ok(Outcome::Rendered(response)) => {
                info!(status = %response.status, "Request resolved");
                Outcome::Rendered(response)
            }
            Ok(deferred) => {
                info!("Request deferred to custom logic");
                deferred
            }
            Err(err) => {
                warn!(status = %err.status(), error = %err, "Request rejected");
                Outcome::Rendered(error_response(&err))
            }
        }
    }

    async fn dispatch(&self, request: ApiRequest) -> Result<Outcome, RequestError> {
        self.authenticate(&request)?;

        let raw = request
            .version
            .as_deref()
            .ok_or_else(|| RequestError::MissingVersionHeader {
                header: self.registry.config().version_header.clone(),
            })?;
        let version = self
            .registry
            .find(raw)
            .ok_or_else(|| RequestError::UnknownVersion(raw.to_string()))?;

        let (action, chain) = locate(version, &request.resource_path, &request.action)?;
        debug!(kind = ?action.kind(), depth = chain.len(), "Action located");

        if !action.permits_access() {
            return Err(RequestError::AccessDenied(request.action));
        }

        let resolved = chain
            .iter()
            .map(|resource| ResolvedResource {
                name: resource.name().to_string(),
                singular: resource.is_singular(),
                model: resource.model().clone(),
            })
            .collect();
        let mut context = ActionContext::new(
            action,
            request.params,
            resolved,
            self.registry.config().default_per_page,
        );

        if let Some(behavior) = action.override_body() {
            return Ok(Outcome::Deferred(CustomLogic {
                behavior: behavior.clone(),
                context,
            }));
        }

        match action.action_body() {
            Some(behavior) => behavior.call(&mut context).await?,
            None => defaults::run(&mut context).await?,
        }
        Ok(Outcome::Rendered(context.into_response()))
    }

    fn authenticate(&self, request: &ApiRequest) -> Result<(), RequestError> {
        let Some(validator) = self.registry.credential_validator() else {
            return Ok(());
        };
        match request.token.as_deref() {
            Some(token) if validator.validate(token) => Ok(()),
            _ => Err(RequestError::TokenRequired),
        }
    }
}

/// Finds the action addressed by `path` and `action`, along with the chain of
/// resources leading to it.
fn locate<'v>(
    version: &'v Version,
    path: &[String],
    action: &str,
) -> Result<(&'v Action, Vec<&'v Resource>), RequestError> {
    let unknown = || RequestError::UnknownRoute {
        path: path.join("/"),
        action: action.to_string(),
    };

    let Some((first, rest)) = path.split_first() else {
        let found = version.actions().find(action).ok_or_else(unknown)?;
        return Ok((found, Vec::new()));
    };

    let mut last = version.resource(first).ok_or_else(unknown)?;
    let mut chain = vec![last];
    for segment in rest {
        last = last.resource(segment).ok_or_else(unknown)?;
        chain.push(last);
    }

    if chain.len() == 1 && !version.has_action(first, action) {
        return Err(unknown());
    }
    let found = last.action(action).ok_or_else(unknown)?;
    Ok((found, chain))
}

fn error_response(err: &RequestError) -> Response {
    Response::new(err.status(), err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::HttpMethod;
    use crate::model::Model;
    use crate::resource::{ActionDsl, ResourceDsl};
    use crate::store::MemoryModels;
    use serde_json::json;
    use std::sync::Arc;

    async fn registry() -> VersionRegistry {
        let models = MemoryModels::builder().model("Product").build();
        let product = models.model("Product").unwrap();
        for title in ["lamp", "desk"] {
            let fields = json!({ "title": title }).as_object().cloned().unwrap();
            product.create(fields).await.unwrap();
        }

        let mut registry = VersionRegistry::new(Arc::new(models));
        registry
            .version(1, |v| {
                v.resources_with("products", ["index", "show"], |r| {
                    r.custom_action(
                        "featured",
                        HttpMethod::Get,
                        Behavior::sync(|ctx| {
                            ctx.body("lamp");
                            ctx.body("ignored");
                            Ok(())
                        }),
                    )?;
                    r.override_action(
                        "destroy",
                        Behavior::sync(|ctx| {
                            ctx.status(Status::NotFound);
                            Ok(())
                        }),
                    )?;
                    Ok(())
                })?;
                v.get("status", Behavior::sync(|ctx| {
                    ctx.body(json!({ "up": true }));
                    Ok(())
                }))?;
                Ok(())
            })
            .unwrap();
        registry
    }

    #[tokio::test]
    async fn test_request_builder_splits_path() {
        let request = ApiRequest::new("index").version("1").path("/products//sales/");
        assert_eq!(request.resource_path, vec!["products", "sales"]);
        assert_eq!(request.version.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_default_index_renders_all_records() {
        let registry = registry().await;
        let resolver = Resolver::new(&registry);
        let outcome = resolver
            .resolve(ApiRequest::new("index").version("1.0").path("products"))
            .await;
        let response = outcome.response().unwrap();
        assert_eq!(response.status, Status::Ok);
        assert_eq!(response.body.as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_body_is_first_write_wins() {
        let registry = registry().await;
        let response = Resolver::new(&registry)
            .resolve(ApiRequest::new("featured").version("1").path("products"))
            .await
            .into_response()
            .await;
        assert_eq!(response.body, json!("lamp"));
    }

    #[tokio::test]
    async fn test_version_level_actions_use_empty_path() {
        let registry = registry().await;
        let response = Resolver::new(&registry)
            .resolve(ApiRequest::new("status").version("1"))
            .await
            .into_response()
            .await;
        assert_eq!(response, Response::ok(json!({ "up": true })));
    }

    #[tokio::test]
    async fn test_unknown_routes_are_not_found() {
        let registry = registry().await;
        let resolver = Resolver::new(&registry);

        let outcome = resolver
            .resolve(ApiRequest::new("update").version("1").path("products"))
            .await;
        let response = outcome.response().unwrap();
        assert_eq!(response.status, Status::NotFound);
        assert_eq!(response.message(), Some("No action `update' on `products'"));

        let outcome = resolver
            .resolve(ApiRequest::new("index").version("1").path("products/sales"))
            .await;
        assert_eq!(outcome.response().unwrap().status, Status::NotFound);
    }

    #[tokio::test]
    async fn test_override_is_deferred() {
        let registry = registry().await;
        let outcome = Resolver::new(&registry)
            .resolve(
                ApiRequest::new("destroy")
                    .version("1")
                    .path("products")
                    .params(json!({ "id": 1 })),
            )
            .await;
        assert!(outcome.is_deferred());

        let Outcome::Deferred(logic) = outcome else {
            unreachable!()
        };
        assert_eq!(logic.context().param("id"), Some(&json!(1)));
        let response = logic.run().await;
        assert_eq!(response.status, Status::NotFound);
        assert_eq!(response.body, json!({}));
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found() {
        let registry = registry().await;
        let response = Resolver::new(&registry)
            .resolve(
                ApiRequest::new("show")
                    .version("1")
                    .path("products")
                    .params(json!({ "id": 99 })),
            )
            .await
            .into_response()
            .await;
        assert_eq!(response.status, Status::NotFound);
        assert_eq!(response.message(), Some("Couldn't find Product with id=99"));
    }

    #[tokio::test]
    async fn test_tokens_are_checked_first() {
        let mut registry = registry().await;
        registry.require_tokens(Arc::new(|token: &str| token == "secret"));
        let resolver = Resolver::new(&registry);

        let response = resolver
            .resolve(ApiRequest::new("index").path("products"))
            .await
            .into_response()
            .await;
        assert_eq!(response.status, Status::Unauthorized);
        assert_eq!(response.message(), Some("A valid API token is required"));

        let response = resolver
            .resolve(
                ApiRequest::new("index")
                    .version("1")
                    .path("products")
                    .token("secret"),
            )
            .await
            .into_response()
            .await;
        assert_eq!(response.status, Status::Ok);
    }
}
