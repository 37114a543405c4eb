//! Type-safe price representation using decimal arithmetic.
//!
//! Prices arrive from the Storefront API as a decimal string plus an ISO 4217
//! currency code (`MoneyV2`). [`Price::format`] renders them the way a
//! browser's `Intl.NumberFormat` currency style would for the request locale:
//!
//! ```rust
//! # use consentido_core::{Locale, Price};
//! let price = Price::parse("19.99", "USD").unwrap();
//! assert_eq!(price.format(&Locale::default()), "$19.99");
//! ```

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::code::{CodeError, CountryCode, CurrencyCode};
use super::locale::Locale;

const NBSP: char = '\u{a0}';
const NARROW_NBSP: &str = "\u{202f}";

/// Errors building a price from API strings.
#[derive(Debug, Error)]
pub enum PriceError {
    /// Amount is not a decimal number.
    #[error("invalid amount: {0}")]
    Amount(#[from] rust_decimal::Error),

    /// Currency is not an ISO 4217 code.
    #[error(transparent)]
    Currency(#[from] CodeError),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Parse a price from the API's string representation.
    ///
    /// # Errors
    ///
    /// Returns `PriceError` if the amount is not a decimal or the currency
    /// code is malformed.
    pub fn parse(amount: &str, currency_code: &str) -> Result<Self, PriceError> {
        Ok(Self {
            amount: Decimal::from_str(amount.trim())?,
            currency_code: CurrencyCode::parse(currency_code)?,
        })
    }

    /// Format for display in the given locale (e.g. `$19.99`, `19,99 €`).
    #[must_use]
    pub fn format(&self, locale: &Locale) -> String {
        let style = NumberStyle::for_language(locale.language.as_str());
        let units = self.currency_code.minor_units();

        let rounded = self
            .amount
            .round_dp_with_strategy(units, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let digits = rounded.abs().to_string();

        let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
        let mut number = style.group(integer);
        if units > 0 {
            number.push(style.decimal);
            number.push_str(fraction);
            for _ in fraction.len()..units as usize {
                number.push('0');
            }
        }

        let symbol = self.currency_code.symbol(locale.country);
        let mut out = String::new();
        if negative {
            out.push('-');
        }
        if style.symbol_first {
            out.push_str(&symbol);
            let alphabetic = symbol.chars().last().is_some_and(char::is_alphabetic);
            if style.space || alphabetic {
                out.push(NBSP);
            }
            out.push_str(&number);
        } else {
            out.push_str(&number);
            out.push(NBSP);
            out.push_str(&symbol);
        }
        out
    }
}

impl CurrencyCode {
    /// Number of digits after the decimal separator (ISO 4217 minor units).
    #[must_use]
    pub fn minor_units(&self) -> u32 {
        match self.as_str() {
            "BIF" | "CLP" | "DJF" | "GNF" | "ISK" | "JPY" | "KMF" | "KRW" | "PYG" | "RWF"
            | "UGX" | "VND" | "VUV" | "XAF" | "XOF" | "XPF" => 0,
            "BHD" | "IQD" | "JOD" | "KWD" | "LYD" | "OMR" | "TND" => 3,
            _ => 2,
        }
    }

    /// Display symbol as seen from a shopper in `country`.
    ///
    /// Dollar-family currencies show a bare `$` only in their home country and
    /// a disambiguating prefix elsewhere. Currencies without a known symbol
    /// fall back to their ISO code.
    #[must_use]
    pub fn symbol(&self, country: CountryCode) -> String {
        let dollar = |home: &str, prefixed: &str| {
            if country.as_str() == home {
                "$".to_string()
            } else {
                prefixed.to_string()
            }
        };

        match self.as_str() {
            "USD" => dollar("US", "US$"),
            "CAD" => dollar("CA", "CA$"),
            "AUD" => dollar("AU", "A$"),
            "NZD" => dollar("NZ", "NZ$"),
            "MXN" => dollar("MX", "MX$"),
            "HKD" => dollar("HK", "HK$"),
            "SGD" => dollar("SG", "S$"),
            "EUR" => "€".to_string(),
            "GBP" => "£".to_string(),
            "JPY" => "¥".to_string(),
            "CNY" => "CN¥".to_string(),
            "INR" => "₹".to_string(),
            "KRW" => "₩".to_string(),
            "ILS" => "₪".to_string(),
            "BRL" => "R$".to_string(),
            other => other.to_string(),
        }
    }
}

/// Number layout conventions for a language.
struct NumberStyle {
    decimal: char,
    group: &'static str,
    /// Integer digits required before grouping kicks in.
    min_grouping_digits: usize,
    symbol_first: bool,
    space: bool,
}

impl NumberStyle {
    fn for_language(language: &str) -> Self {
        match language {
            "FR" => Self {
                decimal: ',',
                group: NARROW_NBSP,
                min_grouping_digits: 4,
                symbol_first: false,
                space: true,
            },
            "DE" | "IT" => Self {
                decimal: ',',
                group: ".",
                min_grouping_digits: 4,
                symbol_first: false,
                space: true,
            },
            "ES" => Self {
                decimal: ',',
                group: ".",
                min_grouping_digits: 5,
                symbol_first: false,
                space: true,
            },
            "NL" | "PT" => Self {
                decimal: ',',
                group: ".",
                min_grouping_digits: 4,
                symbol_first: true,
                space: true,
            },
            _ => Self {
                decimal: '.',
                group: ",",
                min_grouping_digits: 4,
                symbol_first: true,
                space: false,
            },
        }
    }

    /// Insert group separators every three digits from the right.
    fn group(&self, integer: &str) -> String {
        if integer.len() < self.min_grouping_digits {
            return integer.to_string();
        }

        let mut out = String::with_capacity(integer.len() + integer.len() / 3 * 3);
        let lead = integer.len() % 3;
        for (i, c) in integer.chars().enumerate() {
            if i > 0 && (i + 3 - lead) % 3 == 0 {
                out.push_str(self.group);
            }
            out.push(c);
        }
        out
    }
}
