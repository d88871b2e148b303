//! Product management.
//!
//! Operators see both sector prices; the storefront is what narrows a
//! product down to the viewer's price.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use vitrine_core::ProductId;
use vitrine_platform::records::{NewProduct, Product, ProductFilter, ProductPatch};

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Product listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    /// Free-text filter against name and description.
    pub q: Option<String>,
    /// Category slug filter.
    pub category: Option<String>,
}

/// List products with the same filters the storefront offers.
pub async fn index(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<Product>>> {
    let filter = ProductFilter {
        text: query.q,
        category_slug: query.category,
    };
    Ok(Json(state.catalog().list_products(&filter).await?))
}

/// Create a product.
pub async fn create(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(product): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    let created = state.catalog().create_product(&product).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a product.
pub async fn update(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<ProductId>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>> {
    Ok(Json(state.catalog().update_product(id, &patch).await?))
}

/// Delete a product.
pub async fn destroy(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    state.catalog().delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
