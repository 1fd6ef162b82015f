//! `ShopEasy` Core - Shared types library.
//!
//! Typed views of the identifiers, money amounts, and order statuses the
//! `ShopEasy` REST backend exchanges. The storefront (and the CLI through
//! it) parses backend JSON into these types at the edge.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Record IDs, prices, and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
