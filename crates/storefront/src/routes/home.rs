//! Home payload: banners and categories for the landing page.

use axum::{Json, extract::State};
use serde::Serialize;

use vitrine_platform::{Banner, Category};

use crate::error::Result;
use crate::state::AppState;

/// Landing page payload.
#[derive(Debug, Serialize)]
pub struct HomePayload {
    pub banners: Vec<Banner>,
    pub categories: Vec<Category>,
}

/// Landing page data: active banners in display order plus the category list.
pub async fn home(State(state): State<AppState>) -> Result<Json<HomePayload>> {
    let banners = state.catalog().list_banners().await?;
    let categories = state.catalog().list_categories().await?;

    Ok(Json(HomePayload {
        banners,
        categories,
    }))
}
