//! Core types for Consentido.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod code;
pub mod locale;
pub mod price;

pub use code::{CodeError, CountryCode, CurrencyCode, LanguageCode};
pub use locale::{Locale, LocaleError};
pub use price::{Price, PriceError};
