//! Category management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use vitrine_core::CategoryId;
use vitrine_platform::records::{Category, NewCategory};

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// List categories, ordered by name.
pub async fn index(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.catalog().list_categories().await?))
}

/// Create a category.
pub async fn create(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(category): Json<NewCategory>,
) -> Result<(StatusCode, Json<Category>)> {
    let created = state.catalog().create_category(&category).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete a category.
pub async fn destroy(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode> {
    state.catalog().delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
