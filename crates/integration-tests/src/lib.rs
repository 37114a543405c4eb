//! Integration tests for Consentido.
//!
//! These run against a live storefront backed by a real Shopify store, so
//! every test is `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the storefront with valid Shopify credentials
//! cargo run -p consentido-storefront
//!
//! # Run integration tests
//! STOREFRONT_BASE_URL=http://localhost:3000 cargo test -p consentido-integration-tests -- --ignored
//! ```

use consentido_core::Locale;

/// Base URL of the storefront under test.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Absolute URL for `path` on the storefront under test.
#[must_use]
pub fn storefront_url(path: &str) -> String {
    format!("{}{path}", storefront_base_url().trim_end_matches('/'))
}

/// Home page URL for `locale`.
#[must_use]
pub fn localized_home_url(locale: Locale) -> String {
    storefront_url(&format!("/{}", locale.path_segment()))
}

/// Extract the value of the first `attribute="..."` following `marker`.
#[must_use]
pub fn attribute_after<'a>(html: &'a str, marker: &str, attribute: &str) -> Option<&'a str> {
    let start = html.find(marker)?;
    let rest = &html[start..];
    let needle = format!("{attribute}=\"");
    let value_start = rest.find(&needle)? + needle.len();
    let value_len = rest[value_start..].find('"')?;
    Some(&rest[value_start..value_start + value_len])
}
