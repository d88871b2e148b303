//! Checkout handoff.
//!
//! There is no payment flow: checkout hands the conversation to the sales
//! contact on WhatsApp with a prefilled message. The client opens the link
//! in a new browsing context.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use vitrine_core::ProductId;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Checkout query parameters.
#[derive(Debug, Deserialize)]
pub struct CheckoutQuery {
    /// Ask about one product; omitted for the generic sales contact.
    pub product_id: Option<ProductId>,
}

/// Handoff payload.
#[derive(Debug, Serialize)]
pub struct HandoffPayload {
    pub url: String,
}

/// Build the WhatsApp handoff link.
pub async fn whatsapp(
    State(state): State<AppState>,
    Query(query): Query<CheckoutQuery>,
) -> Result<Json<HandoffPayload>> {
    let url = match query.product_id {
        Some(id) => {
            let product = state
                .catalog()
                .get_product(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
            state.whatsapp().product_link(&product)
        }
        None => state.whatsapp().contact_link(),
    };

    Ok(Json(HandoffPayload { url }))
}
