//! GraphQL operations for the Shopify Storefront API.
//!
//! Each operation module mirrors what `#[derive(GraphQLQuery)]` would emit:
//! `QUERY`, `OPERATION_NAME`, `Variables` and `ResponseData`. The documents are
//! written out by hand so they reach Shopify byte-for-byte as authored,
//! including the `@inContext` directive.
//!
//! The derive is not used because it needs a Storefront schema file, which
//! this crate does not vendor, and it would re-print the documents.

use consentido_core::{CountryCode, LanguageCode, Locale};
use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

// Scalar types for Shopify GraphQL schema
// Note: These MUST match the GraphQL schema scalar names exactly (uppercase)
#[allow(clippy::upper_case_acronyms)]
type ID = String;
#[allow(clippy::upper_case_acronyms)]
type URL = String;
type Decimal = String;

/// Image selection shared by both operations.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFields {
    pub id: Option<ID>,
    pub url: URL,
    pub alt_text: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

// =============================================================================
// FeaturedCollection
// =============================================================================

/// Most recently updated collection, awaited before the homepage renders.
pub struct FeaturedCollection;

pub mod featured_collection {
    use super::{CountryCode, Deserialize, ID, ImageFields, LanguageCode, Locale, Serialize};

    pub const OPERATION_NAME: &str = "FeaturedCollection";
    pub const QUERY: &str = r#"#graphql
  fragment FeaturedCollection on Collection {
    id
    title
    image {
      id
      url
      altText
      width
      height
    }
    handle
  }
  query FeaturedCollection($country: CountryCode, $language: LanguageCode)
    @inContext(country: $country, language: $language) {
    collections(first: 1, sortKey: UPDATED_AT, reverse: true) {
      nodes {
        ...FeaturedCollection
      }
    }
  }
"#;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct Variables {
        pub country: Option<CountryCode>,
        pub language: Option<LanguageCode>,
    }

    impl From<Locale> for Variables {
        fn from(locale: Locale) -> Self {
            Self {
                country: Some(locale.country),
                language: Some(locale.language),
            }
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collections: FeaturedCollectionCollections,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct FeaturedCollectionCollections {
        pub nodes: Vec<FeaturedCollectionFields>,
    }

    /// `fragment FeaturedCollection on Collection`
    #[derive(Debug, Clone, Deserialize)]
    pub struct FeaturedCollectionFields {
        pub id: ID,
        pub title: String,
        pub image: Option<ImageFields>,
        pub handle: String,
    }
}

impl GraphQLQuery for FeaturedCollection {
    type Variables = featured_collection::Variables;
    type ResponseData = featured_collection::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: featured_collection::QUERY,
            operation_name: featured_collection::OPERATION_NAME,
        }
    }
}

// =============================================================================
// RecommendedProducts
// =============================================================================

/// Four most recently updated products, loaded in the background.
pub struct RecommendedProducts;

pub mod recommended_products {
    use super::{
        CountryCode, Decimal, Deserialize, ID, ImageFields, LanguageCode, Locale, Serialize,
    };

    pub const OPERATION_NAME: &str = "RecommendedProducts";
    pub const QUERY: &str = r#"#graphql
  fragment RecommendedProduct on Product {
    id
    title
    handle
    priceRange {
      minVariantPrice {
        amount
        currencyCode
      }
    }
    featuredImage {
      id
      url
      altText
      width
      height
    }
  }
  query RecommendedProducts ($country: CountryCode, $language: LanguageCode)
    @inContext(country: $country, language: $language) {
    products(first: 4, sortKey: UPDATED_AT, reverse: true) {
      nodes {
        ...RecommendedProduct
      }
    }
  }
"#;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct Variables {
        pub country: Option<CountryCode>,
        pub language: Option<LanguageCode>,
    }

    impl From<Locale> for Variables {
        fn from(locale: Locale) -> Self {
            Self {
                country: Some(locale.country),
                language: Some(locale.language),
            }
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: RecommendedProductsProducts,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct RecommendedProductsProducts {
        pub nodes: Vec<RecommendedProductFields>,
    }

    /// `fragment RecommendedProduct on Product`
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RecommendedProductFields {
        pub id: ID,
        pub title: String,
        pub handle: String,
        pub price_range: RecommendedProductPriceRange,
        pub featured_image: Option<ImageFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RecommendedProductPriceRange {
        pub min_variant_price: MoneyFields,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MoneyFields {
        pub amount: Decimal,
        pub currency_code: String,
    }
}

impl GraphQLQuery for RecommendedProducts {
    type Variables = recommended_products::Variables;
    type ResponseData = recommended_products::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: recommended_products::QUERY,
            operation_name: recommended_products::OPERATION_NAME,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_featured_collection_document() {
        let doc = featured_collection::QUERY;
        assert!(doc.starts_with("#graphql\n  fragment FeaturedCollection on Collection {"));
        assert!(doc.contains("@inContext(country: $country, language: $language)"));
        assert!(doc.contains("collections(first: 1, sortKey: UPDATED_AT, reverse: true)"));
        assert!(doc.ends_with("  }\n"));
    }

    #[test]
    fn test_recommended_products_document() {
        let doc = recommended_products::QUERY;
        assert!(doc.contains("query RecommendedProducts ($country: CountryCode, $language: LanguageCode)"));
        assert!(doc.contains("products(first: 4, sortKey: UPDATED_AT, reverse: true)"));
        assert!(doc.contains("minVariantPrice {\n        amount\n        currencyCode\n      }"));
    }

    #[test]
    fn test_build_query_body_shape() {
        let locale = Locale::from_path_segment("fr-ca").unwrap();
        let body = FeaturedCollection::build_query(locale.into());
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["operationName"], "FeaturedCollection");
        assert_eq!(value["variables"], json!({"country": "CA", "language": "FR"}));
        assert_eq!(value["query"], featured_collection::QUERY);
    }

    #[test]
    fn test_recommended_products_response_deserializes() {
        let body = json!({
            "products": {
                "nodes": [{
                    "id": "gid://shopify/Product/1",
                    "title": "Beeswax Wraps",
                    "handle": "beeswax-wraps",
                    "priceRange": {"minVariantPrice": {"amount": "19.99", "currencyCode": "USD"}},
                    "featuredImage": null
                }]
            }
        });
        let data: recommended_products::ResponseData = serde_json::from_value(body).unwrap();
        let node = &data.products.nodes[0];
        assert_eq!(node.handle, "beeswax-wraps");
        assert_eq!(node.price_range.min_variant_price.amount, "19.99");
        assert!(node.featured_image.is_none());
    }
}
