//! Storefront paths for products and collections.

use consentido_core::Locale;

/// Builds links relative to the current request.
///
/// Product links keep the locale segment the request arrived with so a
/// visitor on `/fr-ca` stays on French pages. Collection links are
/// unprefixed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
    locale_prefix: Option<String>,
}

impl Links {
    /// Links for a request whose path carried `path_locale`, if any.
    #[must_use]
    pub fn new(path_locale: Option<Locale>) -> Self {
        Self {
            locale_prefix: path_locale.map(|locale| format!("/{}", locale.path_segment())),
        }
    }

    /// `/{locale}/products/{handle}` or `/products/{handle}`.
    #[must_use]
    pub fn product(&self, handle: &str) -> String {
        format!(
            "{}/products/{}",
            self.locale_prefix.as_deref().unwrap_or_default(),
            urlencoding::encode(handle)
        )
    }

    /// `/collections/{handle}`.
    #[must_use]
    pub fn collection(&self, handle: &str) -> String {
        format!("/collections/{}", urlencoding::encode(handle))
    }
}
