//! Type conversion functions for Shopify Storefront API responses.

pub mod collections;
pub mod products;

pub use collections::convert_featured_collection;
pub use products::convert_recommended_product;

use super::queries::ImageFields;
use crate::shopify::types::Image;

fn convert_image(image: ImageFields) -> Image {
    Image {
        id: image.id,
        url: image.url,
        alt_text: image.alt_text,
        width: image.width,
        height: image.height,
    }
}
