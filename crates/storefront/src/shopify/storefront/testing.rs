//! In-process fake of the Storefront API for unit and handler tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use serde_json::{Value, json};
use tokio::sync::Notify;

use super::StorefrontTransport;
use crate::shopify::ShopifyError;

#[derive(Clone)]
enum Reply {
    Body(Value),
    RateLimited(u64),
}

#[derive(Clone, Default)]
struct Route {
    reply: Option<Reply>,
    /// Hold the reply until this fires.
    wait_for: Option<Arc<Notify>>,
    /// Fire this as soon as the request arrives.
    signal: Option<Arc<Notify>>,
}

/// Answers requests by `operationName` with canned envelopes.
#[derive(Default)]
pub struct FakeTransport {
    routes: HashMap<&'static str, Route>,
    requests: Mutex<Vec<Value>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `operation` with `body` (a full `{"data": …}` envelope).
    pub fn reply(mut self, operation: &'static str, body: Value) -> Self {
        self.routes.entry(operation).or_default().reply = Some(Reply::Body(body));
        self
    }

    /// Respond to `operation` with HTTP 429.
    pub fn rate_limited(mut self, operation: &'static str, retry_after: u64) -> Self {
        self.routes.entry(operation).or_default().reply = Some(Reply::RateLimited(retry_after));
        self
    }

    pub fn wait_for(mut self, operation: &'static str, notify: Arc<Notify>) -> Self {
        self.routes.entry(operation).or_default().wait_for = Some(notify);
        self
    }

    pub fn signal(mut self, operation: &'static str, notify: Arc<Notify>) -> Self {
        self.routes.entry(operation).or_default().signal = Some(notify);
        self
    }

    /// Request bodies received so far, in arrival order.
    pub fn requests(&self) -> Vec<Value> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl StorefrontTransport for FakeTransport {
    fn post(&self, body: Value) -> BoxFuture<'_, Result<String, ShopifyError>> {
        let operation = body["operationName"].as_str().unwrap_or_default().to_string();
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(body);
        }
        let route = self.routes.get(operation.as_str()).cloned().unwrap_or_default();

        Box::pin(async move {
            if let Some(signal) = route.signal {
                signal.notify_one();
            }
            if let Some(wait_for) = route.wait_for {
                wait_for.notified().await;
            }
            match route.reply {
                Some(Reply::Body(body)) => Ok(body.to_string()),
                Some(Reply::RateLimited(retry_after)) => Err(ShopifyError::RateLimited(retry_after)),
                None => Err(ShopifyError::message(format!(
                    "unexpected operation {operation}"
                ))),
            }
        })
    }
}

/// `FeaturedCollection` envelope with one collection.
pub fn collection_response(with_image: bool) -> Value {
    let image = with_image.then(|| {
        json!({
            "id": "gid://shopify/CollectionImage/7",
            "url": "https://cdn.shopify.com/s/files/1/0001/collections/kitchen.jpg",
            "altText": "Linen towels and glass jars",
            "width": 2400,
            "height": 1200
        })
    });

    json!({
        "data": {
            "collections": {
                "nodes": [{
                    "id": "gid://shopify/Collection/42",
                    "title": "Kitchen Essentials",
                    "handle": "kitchen-essentials",
                    "image": image
                }]
            }
        }
    })
}

/// `RecommendedProducts` envelope with `count` products, `product-1` first.
pub fn products_response(count: usize) -> Value {
    let nodes: Vec<Value> = (1..=count)
        .map(|i| {
            json!({
                "id": format!("gid://shopify/Product/{i}"),
                "title": format!("Product {i}"),
                "handle": format!("product-{i}"),
                "priceRange": {
                    "minVariantPrice": {"amount": "19.99", "currencyCode": "USD"}
                },
                "featuredImage": {
                    "id": format!("gid://shopify/ProductImage/{i}"),
                    "url": format!("https://cdn.shopify.com/s/files/1/0001/products/{i}.jpg"),
                    "altText": null,
                    "width": 1000,
                    "height": 1000
                }
            })
        })
        .collect();

    json!({"data": {"products": {"nodes": nodes}}})
}
