//! Consentido Core - Shared types library.
//!
//! This crate provides common types used across Consentido components:
//! - `storefront` - Public-facing e-commerce site
//! - `integration-tests` - Black-box HTTP tests against a running storefront
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Validated ISO codes, request locales, and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
