//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use vitrine_core::{CategoryId, ProductId, Sector};
use vitrine_platform::{Product, ProductFilter};

use crate::error::{AppError, Result};
use crate::middleware::CurrentViewer;
use crate::state::AppState;

/// Product display data with the viewer's price already selected.
///
/// The other sector's price never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub sku: Option<String>,
    pub category_id: Option<CategoryId>,
}

impl ProductView {
    /// Project a product for one viewer sector.
    #[must_use]
    pub fn for_sector(product: Product, sector: Option<Sector>) -> Self {
        let price = product.price_for(sector);
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price,
            image_url: product.image_url,
            sku: product.sku,
            category_id: product.category_id,
        }
    }
}

/// Product listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    /// Free-text filter against name and description.
    pub q: Option<String>,
    /// Category slug filter.
    pub category: Option<String>,
}

/// Product listing payload.
#[derive(Debug, Serialize)]
pub struct ProductListPayload {
    pub products: Vec<ProductView>,
    pub count: usize,
}

/// List products, filtered and priced for the viewer.
pub async fn index(
    State(state): State<AppState>,
    CurrentViewer(viewer): CurrentViewer,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<ProductListPayload>> {
    let filter = ProductFilter {
        text: query.q,
        category_slug: query.category,
    };
    let sector = viewer.sector();

    let products: Vec<ProductView> = state
        .catalog()
        .list_products(&filter)
        .await?
        .into_iter()
        .map(|product| ProductView::for_sector(product, sector))
        .collect();

    let count = products.len();
    Ok(Json(ProductListPayload { products, count }))
}

/// Product detail, priced for the viewer.
pub async fn show(
    State(state): State<AppState>,
    CurrentViewer(viewer): CurrentViewer,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductView>> {
    let product = state
        .catalog()
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(ProductView::for_sector(product, viewer.sector())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::generate(),
            name: "Gamer Mouse".to_owned(),
            description: None,
            price_retail: Decimal::new(14990, 2),
            price_reseller: Decimal::new(9990, 2),
            image_url: None,
            sku: None,
            category_id: None,
        }
    }

    #[test]
    fn test_reseller_sees_reseller_price() {
        let view = ProductView::for_sector(product(), Some(Sector::Reseller));
        assert_eq!(view.price, Decimal::new(9990, 2));
    }

    #[test]
    fn test_retail_and_anonymous_see_retail_price() {
        let view = ProductView::for_sector(product(), Some(Sector::Retail));
        assert_eq!(view.price, Decimal::new(14990, 2));

        let view = ProductView::for_sector(product(), None);
        assert_eq!(view.price, Decimal::new(14990, 2));
    }

    #[test]
    fn test_view_serializes_a_single_price_field() {
        let view = ProductView::for_sector(product(), Some(Sector::Reseller));
        let json = serde_json::to_value(&view).expect("serializable");
        assert!(json.get("price").is_some());
        assert!(json.get("price_retail").is_none());
        assert!(json.get("price_reseller").is_none());
    }
}
