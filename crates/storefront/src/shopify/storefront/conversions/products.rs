//! Product type conversion functions.

use crate::shopify::types::{Money, PriceRange, Product};

use super::super::queries::recommended_products;
use super::convert_image;

// =============================================================================
// recommended_products conversions
// =============================================================================

pub fn convert_recommended_product(
    product: recommended_products::RecommendedProductFields,
) -> Product {
    let price = product.price_range.min_variant_price;

    Product {
        id: product.id,
        title: product.title,
        handle: product.handle,
        price_range: PriceRange {
            min_variant_price: Money {
                amount: price.amount,
                currency_code: price.currency_code,
            },
        },
        featured_image: product.featured_image.map(convert_image),
    }
}
