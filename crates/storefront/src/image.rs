//! Responsive image attributes for Shopify CDN images.
//!
//! The CDN resizes on the fly from `width`, `height` and `crop` query
//! parameters, so a `srcset` is a list of the same URL at fixed widths.

use url::Url;

use crate::shopify::types::Image;

/// Smallest width in a generated `srcset`.
pub const SRCSET_STARTING_WIDTH: u32 = 200;

/// Step between `srcset` candidates.
pub const SRCSET_INCREMENT: u32 = 200;

/// Number of `srcset` candidates (200w through 3000w).
pub const SRCSET_INTERVALS: u32 = 15;

/// Width/height ratio an image is cropped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// `1/1`.
    pub const SQUARE: Self = Self {
        width: 1,
        height: 1,
    };

    fn height_for(self, width: u32) -> u32 {
        let height = u64::from(width) * u64::from(self.height) / u64::from(self.width.max(1));
        u32::try_from(height).unwrap_or(u32::MAX)
    }
}

/// Layout hints for one image slot.
#[derive(Debug, Clone, Copy)]
pub struct ImageOptions {
    /// Value of the `sizes` attribute.
    pub sizes: &'static str,
    /// Crop to this ratio; `None` keeps the source ratio.
    pub aspect_ratio: Option<AspectRatio>,
}

impl ImageOptions {
    /// Full-bleed image spanning the viewport.
    pub const FULL_WIDTH: Self = Self {
        sizes: "100vw",
        aspect_ratio: None,
    };

    /// Square product card in the grid.
    pub const PRODUCT_CARD: Self = Self {
        sizes: "(min-width: 45em) 400px, 100vw",
        aspect_ratio: Some(AspectRatio::SQUARE),
    };
}

/// Image display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageView {
    pub src: String,
    pub srcset: String,
    pub sizes: &'static str,
    pub alt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// `loading` attribute, always `lazy`.
    pub loading: &'static str,
}

impl ImageView {
    /// Build `<img>` attributes for `image`.
    ///
    /// An empty or missing alt text falls back to `alt_fallback`.
    #[must_use]
    pub fn new(image: &Image, alt_fallback: &str, options: ImageOptions) -> Self {
        let intrinsic_width = image.width.and_then(|w| u32::try_from(w).ok());
        let intrinsic_height = image.height.and_then(|h| u32::try_from(h).ok());

        let (width, height) = match (options.aspect_ratio, intrinsic_width) {
            (Some(ratio), Some(width)) => (Some(width), Some(ratio.height_for(width))),
            _ => (intrinsic_width, intrinsic_height),
        };

        let srcset = srcset_widths()
            .map(|w| format!("{} {w}w", sized_url(&image.url, w, options.aspect_ratio)))
            .collect::<Vec<_>>()
            .join(", ");

        let src = width.map_or_else(
            || image.url.clone(),
            |w| sized_url(&image.url, w, options.aspect_ratio),
        );

        let alt = image
            .alt_text
            .as_deref()
            .filter(|alt| !alt.trim().is_empty())
            .unwrap_or(alt_fallback)
            .to_string();

        Self {
            src,
            srcset,
            sizes: options.sizes,
            alt,
            width,
            height,
            loading: "lazy",
        }
    }
}

fn srcset_widths() -> impl Iterator<Item = u32> {
    (0..SRCSET_INTERVALS).map(|i| SRCSET_STARTING_WIDTH + i * SRCSET_INCREMENT)
}

/// Append CDN transform parameters to `src`.
///
/// URLs that don't parse are returned unchanged.
#[must_use]
pub fn sized_url(src: &str, width: u32, aspect_ratio: Option<AspectRatio>) -> String {
    let Ok(mut url) = Url::parse(src) else {
        return src.to_string();
    };

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("width", &width.to_string());
        if let Some(ratio) = aspect_ratio {
            query.append_pair("height", &ratio.height_for(width).to_string());
            query.append_pair("crop", "center");
        }
    }

    url.into()
}
