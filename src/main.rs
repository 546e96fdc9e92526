//! # Versioned API demo
//!
//! Defines a small sales API in two versions, seeds an in-memory store, and
//! resolves a handful of requests against it:
//!
//! 1. Version `1.0.0`: `products` (paged index, CRUD) with nested `sales`,
//!    plus a top-level `status` action.
//! 2. Version `1.1.0`: inherits all of it, drops `products#destroy`, adds
//!    `sales` with a singular `payment` under it.
//!
//! Run with `RUST_LOG=info cargo run` to see the resolver's logs.

use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, Instrument};
use versioned_api::action::{Behavior, PAGING};
use versioned_api::config::ApiConfig;
use versioned_api::debug;
use versioned_api::lifecycle::setup_tracing;
use versioned_api::model::{Model, Record};
use versioned_api::resource::{ActionDsl, ResourceDsl};
use versioned_api::store::MemoryModels;
use versioned_api::{ApiRequest, Resolver, VersionRegistry};

fn record(value: Value) -> Record {
    value.as_object().cloned().unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    info!("Starting versioned API demo");

    let config = ApiConfig {
        default_per_page: 2,
        ..ApiConfig::default()
    };
    let models = Arc::new(
        MemoryModels::builder()
            .buffer_size(config.store_buffer)
            .model("Product")
            .model("Sale")
            .model("Payment")
            .has_many("Product", "sales", "Sale")
            .has_one("Sale", "payment", "Payment")
            .build(),
    );

    // Seed data
    let span = tracing::info_span!("seeding");
    async {
        let product = models.model("Product").ok_or("Product model missing")?;
        let sale = models.model("Sale").ok_or("Sale model missing")?;
        let payment = models.model("Payment").ok_or("Payment model missing")?;

        for (title, cost) in [("lamp", 40), ("desk", 250), ("sofa", 900), ("rug", 120)] {
            product
                .create(record(json!({ "title": title, "cost": cost })))
                .await
                .map_err(|e| e.to_string())?;
        }
        sale.create(record(json!({ "product_id": 1, "quantity": 2 })))
            .await
            .map_err(|e| e.to_string())?;
        payment
            .create(record(json!({ "sale_id": 1, "amount": 80 })))
            .await
            .map_err(|e| e.to_string())?;
        Ok::<(), String>(())
    }
    .instrument(span)
    .await?;

    let mut registry = VersionRegistry::with_config(models.clone(), config);
    registry
        .define(|api| {
            api.version(1, |v| {
                v.resources_with("products", ["show", "create", "update", "destroy"], |r| {
                    r.action_with("index", |a| {
                        a.allows(&[PAGING]);
                    })?;
                    r.attributes(|params| Ok(params.require("product")?.permit(&["title", "cost"])));
                    r.resources("sales", ["index"])?;
                    Ok(())
                })?;
                v.get(
                    "status",
                    Behavior::sync(|ctx| {
                        ctx.body(json!({ "status": "up" }));
                        Ok(())
                    }),
                )?;
                Ok(())
            })?;
            api.version("1.1", |v| {
                v.remove_action_from(&["destroy"], "products")?;
                v.resources_with("sales", ["index"], |r| {
                    r.resource("payment", ["show"])?;
                    Ok(())
                })?;
                Ok(())
            })?;
            Ok(())
        })
        .map_err(|e| e.to_string())?;

    let resolver = Resolver::new(&registry);
    let requests = [
        ApiRequest::new("index")
            .version("1.0.0")
            .path("products")
            .params(json!({ "page": 1 })),
        ApiRequest::new("show")
            .version("1")
            .path("products")
            .params(json!({ "id": 2 })),
        ApiRequest::new("create")
            .version("1.0.0")
            .path("products")
            .params(json!({ "product": { "title": "chair", "cost": 75 } })),
        ApiRequest::new("index")
            .version("1.0.0")
            .path("products/sales")
            .params(json!({ "product_id": 1 })),
        ApiRequest::new("show")
            .version("1.1.0")
            .path("sales/payment")
            .params(json!({ "sale_id": 1 })),
        ApiRequest::new("destroy")
            .version("1.1.0")
            .path("products")
            .params(json!({ "id": 1 })),
        ApiRequest::new("status").version("1.1.0"),
        ApiRequest::new("index").path("products"),
    ];

    for request in requests {
        let label = format!(
            "{} {}#{}",
            request.version.as_deref().unwrap_or("-"),
            request.resource_path.join("/"),
            request.action
        );
        let response = resolver.resolve(request).await.into_response().await;
        println!("{label} -> {} {}", response.status, response.body);
    }

    println!("{}", debug::info(&registry));
    for version in registry.versions() {
        println!("Routes for {}", version.number());
        for route in debug::routes(version) {
            println!("  {route}");
        }
    }

    // Shutdown system gracefully
    drop(registry);
    let models = Arc::try_unwrap(models).map_err(|_| "models are still in use".to_string())?;
    models.shutdown().await.map_err(|e| e.to_string())?;

    info!("Demo completed successfully");
    Ok(())
}
