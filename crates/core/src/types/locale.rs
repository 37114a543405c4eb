//! Request locale (language + country).
//!
//! A locale is carried in the URL as an optional leading path segment such as
//! `/en-us` or `/fr-ca`. Requests without a segment use the configured default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::code::{CodeError, CountryCode, LanguageCode};

/// Errors parsing a locale path segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    /// Segment is not of the form `{language}-{country}`.
    #[error("malformed locale segment {0:?}")]
    Malformed(String),

    /// One half of the segment is not a valid ISO code.
    #[error(transparent)]
    Code(#[from] CodeError),
}

/// Language and country context for a single request.
///
/// Sent to the Storefront API as the `@inContext(country:, language:)`
/// variables and used for price formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    /// ISO 639-1 language.
    pub language: LanguageCode,
    /// ISO 3166-1 country.
    pub country: CountryCode,
}

impl Locale {
    /// Create a locale from its parts.
    #[must_use]
    pub const fn new(language: LanguageCode, country: CountryCode) -> Self {
        Self { language, country }
    }

    /// Parse a URL path segment like `en-us` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `LocaleError` if the segment is not `{language}-{country}` with
    /// two-letter codes on both sides.
    pub fn from_path_segment(segment: &str) -> Result<Self, LocaleError> {
        let (language, country) = segment
            .split_once('-')
            .ok_or_else(|| LocaleError::Malformed(segment.to_string()))?;

        Ok(Self {
            language: LanguageCode::parse(language)?,
            country: CountryCode::parse(country)?,
        })
    }

    /// Lowercase path segment, e.g. `en-us`.
    #[must_use]
    pub fn path_segment(&self) -> String {
        format!("{}-{}", self.language, self.country).to_ascii_lowercase()
    }

    /// BCP 47 language tag, e.g. `en-US`.
    #[must_use]
    pub fn language_tag(&self) -> String {
        format!(
            "{}-{}",
            self.language.as_str().to_ascii_lowercase(),
            self.country
        )
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            language: LanguageCode(*b"EN"),
            country: CountryCode(*b"US"),
        }
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_path_segment(s)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path_segment())
    }
}
