//! HTTP transport for Storefront API requests.

use futures::future::BoxFuture;
use secrecy::{ExposeSecret, SecretString};

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::ShopifyError;

/// Delivers a serialized GraphQL request body to the Storefront API and
/// returns the raw response text.
///
/// Status handling (rate limits, non-2xx) belongs here; GraphQL envelope
/// parsing happens in [`super::StorefrontClient`].
pub trait StorefrontTransport: Send + Sync {
    /// POST one request body.
    fn post(&self, body: serde_json::Value) -> BoxFuture<'_, Result<String, ShopifyError>>;
}

/// `reqwest`-backed transport using a private Storefront access token.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
}

impl HttpTransport {
    /// Create a transport for the configured store.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint(),
            access_token: config.storefront_private_token.clone(),
        }
    }

    async fn send(&self, body: serde_json::Value) -> Result<String, ShopifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            // Private access tokens use a different header than public tokens
            // See: https://shopify.dev/docs/storefronts/headless/building-with-the-storefront-api/getting-started
            .header(
                "Shopify-Storefront-Private-Token",
                self.access_token.expose_secret(),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::message(format!(
                "HTTP {status}: {}",
                response_text.chars().take(200).collect::<String>()
            )));
        }

        Ok(response_text)
    }
}

impl StorefrontTransport for HttpTransport {
    fn post(&self, body: serde_json::Value) -> BoxFuture<'_, Result<String, ShopifyError>> {
        Box::pin(self.send(body))
    }
}
