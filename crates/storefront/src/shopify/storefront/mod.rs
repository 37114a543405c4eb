//! Shopify Storefront API client implementation.
//!
//! Builds request bodies with `graphql_client`, sends them through a
//! [`StorefrontTransport`] (`reqwest` 0.13 in production), and converts the
//! responses into domain types.

pub(crate) mod conversions;
pub mod queries;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use consentido_core::Locale;
use graphql_client::{GraphQLQuery, Response};
use tracing::{debug, instrument};

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::types::{Collection, Product};
use crate::shopify::{GraphQLError, GraphQLErrorLocation, ShopifyError};

use conversions::{convert_featured_collection, convert_recommended_product};
use queries::{FeaturedCollection, RecommendedProducts};

pub use transport::{HttpTransport, StorefrontTransport};

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Cheap to clone; clones share the underlying transport.
#[derive(Clone)]
pub struct StorefrontClient {
    transport: Arc<dyn StorefrontTransport>,
}

impl StorefrontClient {
    /// Create a new Storefront API client over HTTP.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        Self::with_transport(Arc::new(HttpTransport::new(config)))
    }

    /// Create a client over an arbitrary transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn StorefrontTransport>) -> Self {
        Self { transport }
    }

    /// Execute a GraphQL query.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let request_body = serde_json::to_value(Q::build_query(variables))?;

        let response_text = self.transport.post(request_body).await?;

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse Shopify GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");

            return Err(ShopifyError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        locations: e.locations.map_or_else(Vec::new, |locs| {
                            locs.into_iter()
                                .map(|l| GraphQLErrorLocation {
                                    line: i64::from(l.line),
                                    column: i64::from(l.column),
                                })
                                .collect()
                        }),
                        path: e.path.map_or_else(Vec::new, |p| {
                            p.into_iter()
                                .map(|fragment| match fragment {
                                    graphql_client::PathFragment::Key(s) => {
                                        serde_json::Value::String(s)
                                    }
                                    graphql_client::PathFragment::Index(i) => {
                                        serde_json::Value::Number(i.into())
                                    }
                                })
                                .collect()
                        }),
                    })
                    .collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                body = %response_text.chars().take(500).collect::<String>(),
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::message("No data in response")
        })
    }

    // =========================================================================
    // Homepage Queries
    // =========================================================================

    /// Get the most recently updated collection.
    ///
    /// Returns `Ok(None)` when the store has no collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(locale = %locale))]
    pub async fn featured_collection(
        &self,
        locale: Locale,
    ) -> Result<Option<Collection>, ShopifyError> {
        let data = self.execute::<FeaturedCollection>(locale.into()).await?;
        Ok(convert_featured_collection(data))
    }

    /// Get the four most recently updated products, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(locale = %locale))]
    pub async fn recommended_products(&self, locale: Locale) -> Result<Vec<Product>, ShopifyError> {
        let data = self.execute::<RecommendedProducts>(locale.into()).await?;

        Ok(data
            .products
            .nodes
            .into_iter()
            .map(convert_recommended_product)
            .collect())
    }
}
