//! Integration tests for the public storefront.
//!
//! These tests require:
//! - A reachable platform instance with seeded catalog data (vitrine-cli seed)
//! - The storefront server running (cargo run -p vitrine-storefront)
//!
//! Run with: cargo test -p vitrine-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::Value;

use vitrine_integration_tests::{session_client, storefront_base_url};

#[tokio::test]
#[ignore = "Requires running storefront server and platform credentials"]
async fn test_health_endpoints() {
    let client = session_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("health request");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("readiness request");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and platform credentials"]
async fn test_anonymous_product_listing_shows_retail_prices() {
    let client = session_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/products"))
        .send()
        .await
        .expect("products request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("products payload");
    let products = body["products"].as_array().expect("products array");
    assert!(!products.is_empty(), "seeded catalog expected");

    // A single price per product; the reseller price never leaves the server.
    for product in products {
        assert!(product.get("price").is_some());
        assert!(product.get("price_retail").is_none());
        assert!(product.get("price_reseller").is_none());
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server and platform credentials"]
async fn test_text_and_category_filters_intersect() {
    let client = session_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/products?q=mouse&category=gamer"))
        .send()
        .await
        .expect("filtered products request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("products payload");
    for product in body["products"].as_array().expect("products array") {
        let name = product["name"].as_str().unwrap_or_default().to_lowercase();
        let description = product["description"]
            .as_str()
            .unwrap_or_default()
            .to_lowercase();
        assert!(name.contains("mouse") || description.contains("mouse"));
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server and platform credentials"]
async fn test_checkout_handoff_link() {
    let client = session_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/checkout/whatsapp"))
        .send()
        .await
        .expect("handoff request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("handoff payload");
    let url = body["url"].as_str().expect("handoff url");
    assert!(url.starts_with("https://wa.me/"));
    assert!(url.contains("text="));
}

#[tokio::test]
#[ignore = "Requires running storefront server and platform credentials"]
async fn test_account_requires_authentication() {
    let client = session_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/account"))
        .send()
        .await
        .expect("account request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server, platform credentials, and a test account"]
async fn test_login_resolves_profile_and_logout_clears_it() {
    let client = session_client();
    let base_url = storefront_base_url();

    let email = std::env::var("TEST_CLIENT_EMAIL").expect("TEST_CLIENT_EMAIL");
    let password = std::env::var("TEST_CLIENT_PASSWORD").expect("TEST_CLIENT_PASSWORD");

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("login request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("session payload");
    assert!(body["identity"]["id"].is_string());
    // The profile is created lazily on first sign-in, retail by default.
    assert_eq!(body["profile"]["sector"], "retail");

    let resp = client
        .get(format!("{base_url}/account"))
        .send()
        .await
        .expect("account request");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(format!("{base_url}/auth/logout"))
        .send()
        .await
        .expect("logout request");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/account"))
        .send()
        .await
        .expect("account request after logout");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
