//! # Debug Listing
//!
//! Human-readable views of a registry: [`info`] prints the version tree,
//! [`routes`] lists what a transport would mount for one version.

use crate::action::{Action, ActionKind, HttpMethod};
use crate::collection::Named;
use crate::model::inflect::singularize;
use crate::resource::Resource;
use crate::version::{Version, VersionRegistry};
use serde::Serialize;
use std::fmt;

/// Every version with its resources (nested ones indented under their
/// parent) and top-level actions.
///
/// ```text
/// Version 1.0.0
///   products/
///     index
///     sales/
///       index
///   status
/// ```
pub fn info(registry: &VersionRegistry) -> String {
    let mut out = String::new();
    for version in registry.versions() {
        out.push_str(&format!("\nVersion {}\n", version.number()));
        for resource in version.resources() {
            list_resource(&mut out, resource, 1);
        }
        for action in version.actions() {
            out.push_str(&format!("  {}\n", action.name()));
        }
    }
    out
}

fn list_resource(out: &mut String, resource: &Resource, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&format!("{indent}{}/\n", resource.name()));
    for action in resource.actions() {
        out.push_str(&format!("{indent}  {}\n", action.name()));
    }
    for child in resource.resources() {
        list_resource(out, child, depth + 1);
    }
}

/// One mountable endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub method: HttpMethod,
    pub path: String,
    pub action: String,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// The routes of `version`: resources depth first, then top-level actions.
///
/// Member actions of plural resources take `/:id`; resources nested under a
/// plural parent take `/:<parent>_id` after the parent's segment.
pub fn routes(version: &Version) -> Vec<Route> {
    let mut routes = Vec::new();
    for resource in version.resources() {
        resource_routes(&mut routes, "", resource);
    }
    for action in version.actions() {
        if let Some(route) = route(action, format!("/{}", action.name())) {
            routes.push(route);
        }
    }
    routes
}

fn resource_routes(routes: &mut Vec<Route>, prefix: &str, resource: &Resource) {
    let base = format!("{prefix}/{}", resource.name());

    for action in resource.actions() {
        let kind = action.kind();
        let path = if kind == ActionKind::Custom {
            format!("{base}/{}", action.name())
        } else if kind.is_member() && !resource.is_singular() {
            format!("{base}/:id")
        } else {
            base.clone()
        };
        if let Some(route) = route(action, path) {
            routes.push(route);
        }
    }

    let nested = if resource.is_singular() {
        base
    } else {
        format!("{base}/:{}_id", singularize(resource.name()))
    };
    for child in resource.resources() {
        resource_routes(routes, &nested, child);
    }
}

fn route(action: &Action, path: String) -> Option<Route> {
    Some(Route {
        method: action.http_method()?,
        path,
        action: action.name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Behavior;
    use crate::resource::{ActionDsl, Actions, ResourceDsl};
    use crate::store::MemoryModels;
    use std::sync::Arc;

    fn registry() -> VersionRegistry {
        let models = MemoryModels::builder()
            .model("Product")
            .model("Sale")
            .model("Payment")
            .has_many("Product", "sales", "Sale")
            .has_one("Sale", "payment", "Payment")
            .build();
        let mut registry = VersionRegistry::new(Arc::new(models));
        registry
            .define(|api| {
                api.version(1, |v| {
                    v.resources_with("products", ["index", "show", "destroy"], |r| {
                        r.resources("sales", ["index"])?;
                        r.get("featured", Behavior::sync(|_| Ok(())))?;
                        Ok(())
                    })?;
                    v.resources_with("sales", Actions::None, |r| {
                        r.resource("payment", ["show"])?;
                        Ok(())
                    })?;
                    v.post("status", Behavior::sync(|_| Ok(())))?;
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap();
        registry
    }

    #[tokio::test]
    async fn test_info_lists_the_tree() {
        let registry = registry();
        let listing = info(&registry);
        assert_eq!(
            listing,
            "\nVersion 1.0.0\n  products/\n    index\n    show\n    destroy\n    featured\n    sales/\n      index\n  sales/\n    payment/\n      show\n  status\n"
        );
    }

    #[tokio::test]
    async fn test_routes_follow_nesting() {
        let registry = registry();
        let routes: Vec<String> = routes(&registry.versions()[0])
            .iter()
            .map(Route::to_string)
            .collect();
        assert_eq!(
            routes,
            vec![
                "GET /products",
                "GET /products/:id",
                "DELETE /products/:id",
                "GET /products/featured",
                "GET /products/:product_id/sales",
                "GET /sales/:sale_id/payment",
                "POST /status",
            ]
        );
    }
}
