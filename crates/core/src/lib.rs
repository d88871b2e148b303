//! Vitrine Core - Shared types library.
//!
//! This crate provides common types used across all Vitrine components:
//! - `platform` - SDK for the hosted auth + data platform
//! - `storefront` - Public-facing storefront API
//! - `admin` - Back-office API for client and catalog management
//! - `cli` - Command-line tools for seeding and account management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and sectors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
