//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home payload (banners + categories)
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /products               - Product listing (?q= text, ?category= slug)
//! GET  /products/{id}          - Product detail
//! GET  /categories             - Category listing
//!
//! # Checkout
//! GET  /checkout/whatsapp      - WhatsApp handoff link (?product_id= optional)
//!
//! # Auth
//! POST /auth/register          - Create an account
//! POST /auth/login             - Sign in with password
//! POST /auth/refresh           - Refresh the platform credential
//! POST /auth/logout            - Sign out
//! GET  /auth/oauth/{provider}  - Redirect to the provider's consent page
//!
//! # Account (requires auth)
//! GET   /account               - Viewer snapshot (identity + profile)
//! PATCH /account               - Self-service profile update (phone)
//! ```

pub mod account;
pub mod auth;
pub mod categories;
pub mod checkout;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/oauth/{provider}", get(auth::oauth_start))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home payload
        .route("/", get(home::home))
        // Catalog
        .nest("/products", product_routes())
        .route("/categories", get(categories::index))
        // Checkout handoff
        .route("/checkout/whatsapp", get(checkout::whatsapp))
        // Account
        .route(
            "/account",
            get(account::show).patch(account::update),
        )
        // Auth
        .nest("/auth", auth_routes())
}
