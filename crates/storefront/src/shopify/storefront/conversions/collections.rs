//! Collection type conversion functions.

use crate::shopify::types::Collection;

use super::super::queries::featured_collection;
use super::convert_image;

// =============================================================================
// featured_collection conversions
// =============================================================================

/// Take the first collection node, if the store has any collections.
pub fn convert_featured_collection(data: featured_collection::ResponseData) -> Option<Collection> {
    data.collections
        .nodes
        .into_iter()
        .next()
        .map(|fields| Collection {
            id: fields.id,
            title: fields.title,
            handle: fields.handle,
            image: fields.image.map(convert_image),
        })
}
