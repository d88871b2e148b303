//! Category route handlers.

use axum::{Json, extract::State};

use vitrine_platform::Category;

use crate::error::Result;
use crate::state::AppState;

/// List all categories, ordered by name.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.catalog().list_categories().await?))
}
