//! HTTP route handlers for the back-office.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Health check
//!
//! # Auth
//! POST /auth/login                 - Operator sign-in (admin profiles only)
//! POST /auth/logout                - Operator sign-out
//!
//! # Clients (admin only)
//! GET    /clients                  - List client profiles, newest first
//! POST   /clients                  - Create a client account
//! POST   /clients/{user_id}/block  - Block or unblock a client
//! POST   /clients/{user_id}/sector - Change a client's pricing sector
//! DELETE /clients/{user_id}        - Delete a client account (identity + profile)
//!
//! # Catalog (admin only)
//! GET    /products                 - List products
//! POST   /products                 - Create a product
//! PATCH  /products/{id}            - Update a product
//! DELETE /products/{id}            - Delete a product
//! GET    /categories               - List categories
//! POST   /categories               - Create a category
//! DELETE /categories/{id}          - Delete a category
//! ```

pub mod auth;
pub mod categories;
pub mod clients;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the client management routes router.
pub fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(clients::index).post(clients::create))
        .route("/{user_id}/block", post(clients::set_blocked))
        .route("/{user_id}/sector", post(clients::set_sector))
        .route("/{user_id}", delete(clients::destroy))
}

/// Create the catalog management routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index).post(products::create))
        .route(
            "/products/{id}",
            axum::routing::patch(products::update).delete(products::destroy),
        )
        .route(
            "/categories",
            get(categories::index).post(categories::create),
        )
        .route("/categories/{id}", delete(categories::destroy))
}

/// Create all routes for the back-office.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/clients", client_routes())
        .merge(catalog_routes())
}
