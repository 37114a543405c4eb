//! Home page route handler.
//!
//! The page streams in three chunks:
//!
//! 1. Shell: banner, featured collection and a loading placeholder for the
//!    product grid. Sent once the featured collection query returns.
//! 2. Product grid: a `<template>` plus a nonce'd script that swaps it into
//!    the placeholder. Sent once the recommended products query settles.
//! 3. Tail: footer and closing tags.

use std::convert::Infallible;

use askama::Template;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use consentido_core::Locale;
use futures::{StreamExt, future, stream};
use tracing::instrument;

use crate::deferred::Deferred;
use crate::error::AppError;
use crate::filters;
use crate::image::{ImageOptions, ImageView};
use crate::links::Links;
use crate::middleware::CspNonce;
use crate::shopify::{Collection, Money, Product, ShopifyError, StorefrontClient};
use crate::state::AppState;

/// Document title for the home page.
pub const META_TITLE: &str = "Consentido - Natural & Sustainable Marketplace";

// =============================================================================
// Loader
// =============================================================================

/// Everything the home page needs.
#[derive(Debug)]
pub struct HomeData {
    /// Newest collection, `None` when the store has none.
    pub featured_collection: Option<Collection>,
    /// Newest products, still loading when the loader returns.
    pub recommended_products: Deferred<Vec<Product>>,
}

/// Load home page data.
///
/// The recommended products query is started first and left running; only
/// the featured collection query is awaited.
///
/// # Errors
///
/// Returns the featured collection query's error. The products query is not
/// cancelled in that case.
pub async fn loader(client: &StorefrontClient, locale: Locale) -> Result<HomeData, ShopifyError> {
    let recommended_products = load_deferred_data(client, locale);
    let featured_collection = load_critical_data(client, locale).await?;

    Ok(HomeData {
        featured_collection,
        recommended_products,
    })
}

/// Above-the-fold data. Failure fails the page.
async fn load_critical_data(
    client: &StorefrontClient,
    locale: Locale,
) -> Result<Option<Collection>, ShopifyError> {
    client.featured_collection(locale).await
}

/// Below-the-fold data. Failure leaves the grid empty.
fn load_deferred_data(client: &StorefrontClient, locale: Locale) -> Deferred<Vec<Product>> {
    let client = client.clone();
    Deferred::spawn("recommended_products", async move {
        client.recommended_products(locale).await
    })
}

// =============================================================================
// Views
// =============================================================================

/// Featured collection display data. Only exists for collections with an image.
#[derive(Debug, Clone)]
pub struct FeaturedCollectionView {
    pub title: String,
    pub url: String,
    pub image: ImageView,
}

impl FeaturedCollectionView {
    fn new(collection: &Collection, links: &Links) -> Option<Self> {
        let image = collection.image.as_ref()?;

        Some(Self {
            title: collection.title.clone(),
            url: links.collection(&collection.handle),
            image: ImageView::new(image, "", ImageOptions::FULL_WIDTH),
        })
    }
}

/// Product card display data.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub title: String,
    pub url: String,
    pub price: String,
    pub image: Option<ImageView>,
}

impl ProductView {
    fn new(product: &Product, links: &Links, locale: &Locale) -> Self {
        Self {
            title: product.title.clone(),
            url: links.product(&product.handle),
            price: format_price(&product.price_range.min_variant_price, locale),
            image: product
                .featured_image
                .as_ref()
                .map(|image| ImageView::new(image, &product.title, ImageOptions::PRODUCT_CARD)),
        }
    }
}

/// Format a Shopify Money value for display in `locale`.
fn format_price(money: &Money, locale: &Locale) -> String {
    money.to_price().map_or_else(
        |e| {
            tracing::warn!(error = %e, amount = %money.amount, currency = %money.currency_code, "Unformattable price");
            format!("{} {}", money.amount, money.currency_code)
        },
        |price| price.format(locale),
    )
}

// =============================================================================
// Templates
// =============================================================================

/// Page shell, everything up to the product grid placeholder.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub lang: String,
    pub title: &'static str,
    pub featured_collection: Option<FeaturedCollectionView>,
}

/// Product grid chunk. `products` is `None` when the query failed.
#[derive(Template)]
#[template(path = "partials/recommended_products.html")]
pub struct RecommendedProductsTemplate {
    pub products: Option<Vec<ProductView>>,
    pub nonce: String,
}

/// Footer and closing tags.
#[derive(Template)]
#[template(path = "partials/document_end.html")]
pub struct DocumentEndTemplate;

// =============================================================================
// Handlers
// =============================================================================

/// Display the home page in the default locale.
#[instrument(skip(state, nonce))]
pub async fn home(State(state): State<AppState>, nonce: CspNonce) -> Result<Response, AppError> {
    let locale = state.config().default_locale;
    render(&state, locale, Links::new(None), nonce).await
}

/// Display the home page for a `/{locale}` path such as `/fr-ca`.
///
/// Segments that don't parse, or name a locale the store doesn't serve, are
/// 404s and never reach Shopify.
#[instrument(skip(state, nonce))]
pub async fn home_localized(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    nonce: CspNonce,
) -> Result<Response, AppError> {
    let locale = Locale::from_path_segment(&segment)
        .ok()
        .filter(|locale| state.config().supports_locale(locale))
        .ok_or_else(|| AppError::NotFound(format!("no page at /{segment}")))?;

    render(&state, locale, Links::new(Some(locale)), nonce).await
}

async fn render(
    state: &AppState,
    locale: Locale,
    links: Links,
    CspNonce(nonce): CspNonce,
) -> Result<Response, AppError> {
    let HomeData {
        featured_collection,
        recommended_products,
    } = loader(state.storefront(), locale).await?;

    let shell = HomeTemplate {
        lang: locale.language_tag(),
        title: META_TITLE,
        featured_collection: featured_collection
            .as_ref()
            .and_then(|collection| FeaturedCollectionView::new(collection, &links)),
    }
    .render()?;
    let tail = DocumentEndTemplate.render()?;

    let grid = async move {
        let products = recommended_products.settle().await.map(|products| {
            products
                .iter()
                .map(|product| ProductView::new(product, &links, &locale))
                .collect()
        });

        RecommendedProductsTemplate { products, nonce }
            .render()
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Failed to render recommended products");
                String::new()
            })
    };

    let chunks = stream::once(future::ready(shell))
        .chain(stream::once(grid))
        .chain(stream::once(future::ready(tail)))
        .map(Ok::<_, Infallible>);

    Ok((
        [(CONTENT_TYPE, "text/html; charset=utf-8")],
        Body::from_stream(chunks),
    )
        .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::to_bytes;
    use axum::http::{Request, StatusCode};
    use tokio::sync::Notify;
    use tower::ServiceExt;

    use super::*;
    use crate::config::tests::test_config;
    use crate::shopify::storefront::queries::{featured_collection, recommended_products};
    use crate::shopify::storefront::testing::{
        FakeTransport, collection_response, products_response,
    };

    const WAIT: Duration = Duration::from_secs(2);

    fn client(transport: FakeTransport) -> (StorefrontClient, Arc<FakeTransport>) {
        let transport = Arc::new(transport);
        (StorefrontClient::with_transport(transport.clone()), transport)
    }

    fn happy_upstream() -> FakeTransport {
        FakeTransport::new()
            .reply(featured_collection::OPERATION_NAME, collection_response(true))
            .reply(recommended_products::OPERATION_NAME, products_response(4))
    }

    fn app(transport: FakeTransport) -> (axum::Router, Arc<FakeTransport>) {
        let (client, transport) = client(transport);
        let state = AppState::with_client(test_config(), client);
        (crate::app(state), transport)
    }

    async fn get(router: axum::Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn products(count: usize) -> Vec<Product> {
        let data: crate::shopify::storefront::queries::recommended_products::ResponseData =
            serde_json::from_value(products_response(count)["data"].clone()).unwrap();
        data.products
            .nodes
            .into_iter()
            .map(crate::shopify::storefront::conversions::convert_recommended_product)
            .collect()
    }

    // -------------------------------------------------------------------------
    // Loader
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_deferred_query_starts_before_critical_resolves() {
        let critical_gate = Arc::new(Notify::new());
        let deferred_started = Arc::new(Notify::new());
        let (client, _) = client(
            happy_upstream()
                .wait_for(featured_collection::OPERATION_NAME, critical_gate.clone())
                .signal(recommended_products::OPERATION_NAME, deferred_started.clone()),
        );

        let pending = tokio::spawn(async move { loader(&client, Locale::default()).await });

        // Products request arrives while the collection request is held
        tokio::time::timeout(WAIT, deferred_started.notified())
            .await
            .unwrap();
        assert!(!pending.is_finished());

        critical_gate.notify_one();
        let data = pending.await.unwrap().unwrap();
        assert_eq!(data.recommended_products.settle().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_loader_returns_before_deferred_settles() {
        let deferred_gate = Arc::new(Notify::new());
        let (client, _) = client(
            happy_upstream().wait_for(recommended_products::OPERATION_NAME, deferred_gate.clone()),
        );

        let data = tokio::time::timeout(WAIT, loader(&client, Locale::default()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            data.featured_collection.unwrap().handle,
            "kitchen-essentials"
        );
        assert!(!data.recommended_products.is_settled());

        deferred_gate.notify_one();
        let products = data.recommended_products.settle().await.unwrap();
        let handles: Vec<_> = products.iter().map(|p| p.handle.as_str()).collect();
        assert_eq!(handles, ["product-1", "product-2", "product-3", "product-4"]);
    }

    #[tokio::test]
    async fn test_critical_failure_fails_loader() {
        let (client, _) = client(
            FakeTransport::new()
                .rate_limited(featured_collection::OPERATION_NAME, 5)
                .reply(recommended_products::OPERATION_NAME, products_response(4)),
        );

        let err = loader(&client, Locale::default()).await.unwrap_err();
        assert!(matches!(err, ShopifyError::RateLimited(5)));
    }

    #[tokio::test]
    async fn test_deferred_failure_settles_empty() {
        let (client, _) = client(
            FakeTransport::new()
                .reply(featured_collection::OPERATION_NAME, collection_response(true))
                .rate_limited(recommended_products::OPERATION_NAME, 5),
        );

        let data = loader(&client, Locale::default()).await.unwrap();
        assert!(data.featured_collection.is_some());
        assert!(data.recommended_products.settle().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_store_has_no_featured_collection() {
        let (client, _) = client(
            FakeTransport::new()
                .reply(
                    featured_collection::OPERATION_NAME,
                    serde_json::json!({"data": {"collections": {"nodes": []}}}),
                )
                .reply(recommended_products::OPERATION_NAME, products_response(0)),
        );

        let data = loader(&client, Locale::default()).await.unwrap();
        assert!(data.featured_collection.is_none());
        assert_eq!(data.recommended_products.settle().await, Some(vec![]));
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    fn collection(with_image: bool) -> Collection {
        let data: crate::shopify::storefront::queries::featured_collection::ResponseData =
            serde_json::from_value(collection_response(with_image)["data"].clone()).unwrap();
        crate::shopify::storefront::conversions::convert_featured_collection(data).unwrap()
    }

    fn shell(featured: Option<&Collection>) -> String {
        HomeTemplate {
            lang: "en-US".to_string(),
            title: META_TITLE,
            featured_collection: featured
                .and_then(|c| FeaturedCollectionView::new(c, &Links::default())),
        }
        .render()
        .unwrap()
    }

    #[test]
    fn test_shell_has_banner_and_placeholder() {
        let html = shell(None);
        assert!(html.contains("<title>Consentido - Natural &#38; Sustainable Marketplace</title>"));
        assert!(html.contains("natural &amp; sustainable"));
        assert!(html.contains(
            "discover handcrafted, eco-friendly products made with care for you and the earth"
        ));
        assert!(html.contains("curated selection"));
        assert!(html.contains("loading..."));
        assert!(!html.contains("featured-collection"));
    }

    #[test]
    fn test_featured_collection_with_image() {
        let html = shell(Some(&collection(true)));
        assert!(html.contains(r#"class="featured-collection" href="/collections/kitchen-essentials""#));
        assert!(html.contains("<h2>Kitchen Essentials</h2>"));
        assert!(html.contains(r#"sizes="100vw""#));
        assert!(html.contains(r#"alt="Linen towels and glass jars""#));
    }

    #[test]
    fn test_featured_collection_without_image_renders_nothing() {
        let html = shell(Some(&collection(false)));
        assert!(!html.contains("featured-collection"));
        assert!(!html.contains("Kitchen Essentials"));
    }

    #[test]
    fn test_grid_renders_cards_in_order() {
        let links = Links::default();
        let locale = Locale::default();
        let views = products(4)
            .iter()
            .map(|p| ProductView::new(p, &links, &locale))
            .collect();

        let html = RecommendedProductsTemplate {
            products: Some(views),
            nonce: "bm9uY2U=".to_string(),
        }
        .render()
        .unwrap();

        assert_eq!(html.matches(r#"class="product-item""#).count(), 4);
        let first = html.find(r#"href="/products/product-1""#).unwrap();
        let last = html.find(r#"href="/products/product-4""#).unwrap();
        assert!(first < last);
        assert_eq!(html.matches("<small>$19.99</small>").count(), 4);
        assert!(html.contains(r#"alt="Product 1""#));
        assert!(html.contains(r#"<script nonce="bm9uY2U=">"#));
    }

    #[test]
    fn test_card_without_image() {
        let mut product = products(1).remove(0);
        product.featured_image = None;

        let view = ProductView::new(&product, &Links::default(), &Locale::default());
        assert!(view.image.is_none());

        let html = RecommendedProductsTemplate {
            products: Some(vec![view]),
            nonce: String::new(),
        }
        .render()
        .unwrap();

        assert_eq!(html.matches(r#"class="product-item""#).count(), 1);
        assert!(!html.contains("<img"));
        assert!(!html.contains("product-item-image"));
        assert!(html.contains("<h4>Product 1</h4>"));
        assert!(html.contains("<small>$19.99</small>"));
    }

    #[test]
    fn test_grid_sentinel_renders_empty() {
        let html = RecommendedProductsTemplate {
            products: None,
            nonce: String::new(),
        }
        .render()
        .unwrap();

        assert!(html.contains("recommended-products-grid"));
        assert!(!html.contains("product-item"));
    }

    #[test]
    fn test_unparseable_price_shows_raw_amount() {
        let money = Money {
            amount: "free".to_string(),
            currency_code: "USD".to_string(),
        };
        assert_eq!(format_price(&money, &Locale::default()), "free USD");
    }

    // -------------------------------------------------------------------------
    // Handlers
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_home_renders_full_page() {
        let (router, transport) = app(happy_upstream());

        let (status, html) = get(router, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="en-US">"#));
        assert!(html.contains("<h2>Kitchen Essentials</h2>"));
        assert_eq!(html.matches(r#"class="product-item""#).count(), 4);
        assert!(html.trim_end().ends_with("</html>"));

        // One round trip per query
        let operations: Vec<_> = transport
            .requests()
            .iter()
            .map(|r| r["operationName"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(operations.len(), 2);
        assert!(operations.contains(&"FeaturedCollection".to_string()));
        assert!(operations.contains(&"RecommendedProducts".to_string()));
    }

    #[tokio::test]
    async fn test_home_localized_prefixes_product_links() {
        let (router, transport) = app(happy_upstream());

        let (status, html) = get(router, "/fr-ca").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(r#"<html lang="fr-CA">"#));
        assert!(html.contains(r#"href="/fr-ca/products/product-1""#));
        assert!(html.contains(r#"href="/collections/kitchen-essentials""#));

        for request in transport.requests() {
            assert_eq!(
                request["variables"],
                serde_json::json!({"country": "CA", "language": "FR"})
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_locale_is_not_found() {
        let (router, transport) = app(happy_upstream());

        let (status, _) = get(router, "/not-a-locale").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_unserved_locale_is_not_found() {
        let (router, transport) = app(happy_upstream());

        let (status, html) = get(router, "/qq-zz").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(html.contains("Page not found"));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_critical_failure_is_bad_gateway() {
        let (router, _) = app(
            FakeTransport::new()
                .rate_limited(featured_collection::OPERATION_NAME, 5)
                .reply(recommended_products::OPERATION_NAME, products_response(4)),
        );

        let (status, html) = get(router, "/").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!html.contains("product-item"));
    }

    #[tokio::test]
    async fn test_deferred_failure_still_renders_page() {
        let (router, _) = app(
            FakeTransport::new()
                .reply(featured_collection::OPERATION_NAME, collection_response(true))
                .rate_limited(recommended_products::OPERATION_NAME, 5),
        );

        let (status, html) = get(router, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("<h2>Kitchen Essentials</h2>"));
        assert!(html.contains("recommended-products-grid"));
        assert!(!html.contains("product-item"));
    }

    #[tokio::test]
    async fn test_shell_streams_before_products_settle() {
        let deferred_gate = Arc::new(Notify::new());
        let (router, _) = app(
            happy_upstream().wait_for(recommended_products::OPERATION_NAME, deferred_gate.clone()),
        );

        let response = tokio::time::timeout(
            WAIT,
            router.oneshot(Request::builder().uri("/").body(Body::empty()).unwrap()),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let mut chunks = response.into_body().into_data_stream();
        let first = chunks.next().await.unwrap().unwrap();
        let first = String::from_utf8(first.to_vec()).unwrap();
        assert!(first.contains("loading..."));
        assert!(!first.contains("product-item"));

        deferred_gate.notify_one();
        let mut rest = String::new();
        while let Some(chunk) = chunks.next().await {
            rest.push_str(&String::from_utf8(chunk.unwrap().to_vec()).unwrap());
        }
        assert_eq!(rest.matches(r#"class="product-item""#).count(), 4);
        assert!(rest.trim_end().ends_with("</html>"));
    }
}
