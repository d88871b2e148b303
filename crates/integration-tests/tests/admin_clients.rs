//! Integration tests for back-office client management.
//!
//! These tests require:
//! - A reachable platform instance
//! - The admin server running (cargo run -p vitrine-admin)
//! - An operator account (`TEST_ADMIN_EMAIL` / `TEST_ADMIN_PASSWORD`)
//!
//! Run with: cargo test -p vitrine-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

use vitrine_integration_tests::{admin_base_url, session_client};

/// Sign in as the test operator and return the cookie-carrying client.
async fn operator_client() -> Client {
    let client = session_client();
    let base_url = admin_base_url();

    let email = std::env::var("TEST_ADMIN_EMAIL").expect("TEST_ADMIN_EMAIL");
    let password = std::env::var("TEST_ADMIN_PASSWORD").expect("TEST_ADMIN_PASSWORD");

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("operator login");
    assert_eq!(resp.status(), StatusCode::OK);

    client
}

#[tokio::test]
#[ignore = "Requires running admin server and an operator account"]
async fn test_client_routes_reject_anonymous_requests() {
    let client = session_client();
    let base_url = admin_base_url();

    let resp = client
        .get(format!("{base_url}/clients"))
        .send()
        .await
        .expect("clients request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server and an operator account"]
async fn test_client_lifecycle_block_sector_delete() {
    let client = operator_client().await;
    let base_url = admin_base_url();

    // Create a throwaway client account.
    let email = format!("it-{}@example.com", Uuid::new_v4());
    let resp = client
        .post(format!("{base_url}/clients"))
        .json(&json!({
            "email": email,
            "password": "integration-test-password-1",
            "sector": "retail",
        }))
        .send()
        .await
        .expect("create client");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let created: Value = resp.json().await.expect("created profile");
    let user_id = created["user_id"].as_str().expect("user_id").to_owned();
    assert_eq!(created["sector"], "retail");
    assert_eq!(created["is_blocked"], false);

    // Block, then promote to reseller pricing.
    let resp = client
        .post(format!("{base_url}/clients/{user_id}/block"))
        .json(&json!({ "blocked": true }))
        .send()
        .await
        .expect("block client");
    assert_eq!(resp.status(), StatusCode::OK);
    let blocked: Value = resp.json().await.expect("blocked profile");
    assert_eq!(blocked["is_blocked"], true);

    let resp = client
        .post(format!("{base_url}/clients/{user_id}/sector"))
        .json(&json!({ "sector": "reseller" }))
        .send()
        .await
        .expect("sector change");
    assert_eq!(resp.status(), StatusCode::OK);
    let promoted: Value = resp.json().await.expect("promoted profile");
    assert_eq!(promoted["sector"], "reseller");

    // Delete, then verify the profile is gone from the listing.
    let resp = client
        .delete(format!("{base_url}/clients/{user_id}"))
        .send()
        .await
        .expect("delete client");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/clients"))
        .send()
        .await
        .expect("clients listing");
    assert_eq!(resp.status(), StatusCode::OK);
    let listing: Value = resp.json().await.expect("clients payload");
    let still_there = listing
        .as_array()
        .expect("clients array")
        .iter()
        .any(|profile| profile["user_id"] == user_id.as_str());
    assert!(!still_there, "deleted client must not be listed");
}
