//! Storefront services.

pub mod resolvers;
pub mod whatsapp;
