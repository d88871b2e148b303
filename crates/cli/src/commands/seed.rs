//! Starter catalog data.
//!
//! Idempotent-ish by convention: running it against a non-empty catalog just
//! adds duplicates, so it is meant for fresh environments.

use rust_decimal::Decimal;

use vitrine_platform::Catalog;
use vitrine_platform::records::{NewCategory, NewProduct};
use vitrine_platform::rest::RestClient;

use super::platform_from_env;

/// Insert starter categories and products.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = platform_from_env()?;
    let catalog = Catalog::new(RestClient::new(&config));

    let categories = [
        ("Periféricos", "perifericos"),
        ("Gamer", "gamer"),
        ("Informática", "informatica"),
    ];

    let mut created = Vec::new();
    for (name, slug) in categories {
        let category = catalog
            .create_category(&NewCategory {
                name: name.to_owned(),
                slug: slug.to_owned(),
            })
            .await?;
        tracing::info!(slug = %category.slug, "category created");
        created.push(category);
    }

    let gamer = created.iter().find(|c| c.slug == "gamer").map(|c| c.id);
    let perifericos = created
        .iter()
        .find(|c| c.slug == "perifericos")
        .map(|c| c.id);

    let products = [
        NewProduct {
            name: "Mouse Óptico Sem Fio".to_owned(),
            description: Some("Mouse sem fio 1600 DPI com receptor USB".to_owned()),
            price_retail: Decimal::new(7990, 2),
            price_reseller: Decimal::new(5490, 2),
            image_url: None,
            sku: Some("MOU-001".to_owned()),
            category_id: perifericos,
        },
        NewProduct {
            name: "Teclado Mecânico RGB".to_owned(),
            description: Some("Switch blue, ABNT2, iluminação RGB".to_owned()),
            price_retail: Decimal::new(29990, 2),
            price_reseller: Decimal::new(21990, 2),
            image_url: None,
            sku: Some("TEC-010".to_owned()),
            category_id: gamer,
        },
        NewProduct {
            name: "Headset Gamer 7.1".to_owned(),
            description: Some("Som surround 7.1, microfone retrátil".to_owned()),
            price_retail: Decimal::new(19990, 2),
            price_reseller: Decimal::new(14490, 2),
            image_url: None,
            sku: Some("HEA-022".to_owned()),
            category_id: gamer,
        },
    ];

    for product in &products {
        let row = catalog.create_product(product).await?;
        tracing::info!(name = %row.name, "product created");
    }

    tracing::info!("seed complete");
    Ok(())
}
