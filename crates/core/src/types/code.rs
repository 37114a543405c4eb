//! Fixed-width ISO codes (countries, languages, currencies).
//!
//! Use the `define_code!` macro to create validated, uppercase code wrappers
//! that serialize as plain strings, matching how the Storefront API spells
//! its `CountryCode`, `LanguageCode` and `CurrencyCode` enums.

use thiserror::Error;

/// A code string that is not the expected number of ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} {value:?}: expected {len} ASCII letters")]
pub struct CodeError {
    /// Which kind of code was being parsed.
    pub kind: &'static str,
    /// Required length.
    pub len: usize,
    /// The rejected input.
    pub value: String,
}

/// Macro to define a fixed-width ISO code wrapper.
///
/// Creates a `Copy` newtype around `[u8; N]` with:
/// - Case-insensitive `parse()` that stores the code uppercased
/// - `as_str()`, `Display` and `FromStr`
/// - `Serialize`/`Deserialize` as a plain string
macro_rules! define_code {
    ($(#[$meta:meta])* $name:ident, $len:literal, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) [u8; $len]);

        impl $name {
            /// Parse a code, accepting any ASCII letter case.
            ///
            /// # Errors
            ///
            /// Returns `CodeError` if the input is not exactly the expected
            /// number of ASCII letters.
            pub fn parse(value: &str) -> Result<Self, CodeError> {
                let bytes = value.as_bytes();
                let invalid = || CodeError {
                    kind: $kind,
                    len: $len,
                    value: value.to_string(),
                };

                if bytes.len() != $len || !bytes.iter().all(u8::is_ascii_alphabetic) {
                    return Err(invalid());
                }

                let mut code = [0u8; $len];
                for (slot, byte) in code.iter_mut().zip(bytes) {
                    *slot = byte.to_ascii_uppercase();
                }
                Ok(Self(code))
            }

            /// The uppercase code.
            #[must_use]
            pub fn as_str(&self) -> &str {
                // Only ASCII letters are ever stored.
                ::core::str::from_utf8(&self.0).unwrap_or_default()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = CodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                Self::parse(&value).map_err(::serde::de::Error::custom)
            }
        }
    };
}

define_code!(
    /// ISO 3166-1 alpha-2 country code (e.g. `US`).
    CountryCode,
    2,
    "country code"
);

define_code!(
    /// ISO 639-1 language code (e.g. `EN`).
    LanguageCode,
    2,
    "language code"
);

define_code!(
    /// ISO 4217 currency code (e.g. `USD`).
    CurrencyCode,
    3,
    "currency code"
);
