//! Client SDK for the hosted auth + data platform.
//!
//! # Architecture
//!
//! - The platform is the single source of truth - NO local database, direct
//!   API calls for every read and write
//! - [`auth::AuthClient`] talks to the platform's auth service (password and
//!   refresh grants, sign-up, OAuth handoff, service-role admin operations)
//! - [`rest::RestClient`] talks to the platform's table API with
//!   filter/order/limit predicates
//! - [`Catalog`] and [`ProfileStore`] are the typed facades the binaries
//!   consume; neither carries a cache or retry layer - failures propagate as
//!   tagged errors
//! - [`session::SessionResolver`] establishes the current identity/profile
//!   pair with a bounded total wait (see module docs for the race rules)
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine_platform::{Catalog, PlatformConfig, ProductFilter, rest::RestClient};
//!
//! let config = PlatformConfig::new(base_url, anon_key, Some(service_key))?;
//! let catalog = Catalog::new(RestClient::new(&config));
//!
//! // Text + category filters intersect
//! let hits = catalog
//!     .list_products(&ProductFilter {
//!         text: Some("mouse".into()),
//!         category_slug: Some("gamer".into()),
//!     })
//!     .await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod profiles;
pub mod records;
pub mod rest;
pub mod session;

pub use catalog::Catalog;
pub use config::PlatformConfig;
pub use error::PlatformError;
pub use profiles::ProfileStore;
pub use records::{
    Banner, Category, NewCategory, NewProduct, NewProfile, Product, ProductFilter, ProductPatch,
    Profile, ProfilePatch,
};
