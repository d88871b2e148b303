//! Client tests against an in-process fake of the hosted platform.
//!
//! The fake serves just enough of the auth and table APIs to verify the
//! request shapes the SDK sends and the way responses are decoded. It is
//! not a reimplementation of the platform's filtering; filter tests assert
//! on the predicates received.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use vitrine_core::{Email, Sector, UserId};
use vitrine_platform::auth::{AuthClient, AuthError};
use vitrine_platform::rest::RestClient;
use vitrine_platform::{Catalog, PlatformConfig, PlatformError, ProductFilter, ProfileStore};

const ANON_KEY: &str = "anon-test-key";
const SERVICE_KEY: &str = "service-test-key";
const GAMER_CATEGORY_ID: &str = "61f1a3a0-6b64-4b7b-9d5e-0a1c2b3d4e5f";
const CLIENT_USER_ID: &str = "7f8a1c9e-0b4d-4f6a-9c3e-2d5b8a7f1e0c";

#[derive(Default)]
struct MockState {
    product_queries: Vec<Vec<(String, String)>>,
    profiles: HashMap<String, Value>,
    deleted_users: HashSet<String>,
    last_profile_patch: Option<Value>,
    rate_limit_products: bool,
}

type Shared = Arc<Mutex<MockState>>;

fn parse_query(raw: Option<String>) -> Vec<(String, String)> {
    raw.map(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    })
    .unwrap_or_default()
}

fn session_json(user_id: &str, email: &str) -> Value {
    json!({
        "access_token": format!("access-{user_id}"),
        "refresh_token": format!("refresh-{user_id}"),
        "expires_at": 4_102_444_800_i64,
        "user": { "id": user_id, "email": email },
    })
}

async fn token(
    State(_state): State<Shared>,
    RawQuery(raw): RawQuery,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let query = parse_query(raw);
    let grant = query
        .iter()
        .find(|(k, _)| k == "grant_type")
        .map(|(_, v)| v.as_str())
        .unwrap_or_default()
        .to_owned();

    match grant.as_str() {
        "password" => {
            if body["email"] == "client@example.com" && body["password"] == "correct-horse" {
                Json(session_json(CLIENT_USER_ID, "client@example.com")).into_response()
            } else {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error_description": "Invalid login credentials"})),
                )
                    .into_response()
            }
        }
        "refresh_token" => {
            Json(session_json(CLIENT_USER_ID, "client@example.com")).into_response()
        }
        _ => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn signup(Json(body): Json<Value>) -> impl IntoResponse {
    // Confirmation required: a user but no session.
    Json(json!({
        "user": {
            "id": CLIENT_USER_ID,
            "email": body["email"],
            "user_metadata": body["data"],
        }
    }))
}

async fn user(State(state): State<Shared>, headers: HeaderMap) -> impl IntoResponse {
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();

    let deleted = state
        .lock()
        .expect("mock state")
        .deleted_users
        .contains(CLIENT_USER_ID);

    if deleted || bearer != format!("Bearer access-{CLIENT_USER_ID}") {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    Json(json!({ "id": CLIENT_USER_ID, "email": "client@example.com" })).into_response()
}

async fn admin_delete_user(
    State(state): State<Shared>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if bearer != format!("Bearer {SERVICE_KEY}") {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    state
        .lock()
        .expect("mock state")
        .deleted_users
        .insert(user_id);
    Json(json!({})).into_response()
}

async fn categories(RawQuery(raw): RawQuery) -> impl IntoResponse {
    let query = parse_query(raw);
    let slug = query
        .iter()
        .find(|(k, _)| k == "slug")
        .map(|(_, v)| v.as_str());

    match slug {
        Some("eq.gamer") | None => Json(json!([
            { "id": GAMER_CATEGORY_ID, "name": "Gamer", "slug": "gamer" }
        ]))
        .into_response(),
        Some(_) => Json(json!([])).into_response(),
    }
}

async fn products(State(state): State<Shared>, RawQuery(raw): RawQuery) -> impl IntoResponse {
    let query = parse_query(raw);
    let mut guard = state.lock().expect("mock state");
    guard.product_queries.push(query);

    if guard.rate_limit_products {
        return (StatusCode::TOO_MANY_REQUESTS, [("Retry-After", "7")], "").into_response();
    }

    Json(json!([
        {
            "id": "0a1b2c3d-4e5f-6071-8293-a4b5c6d7e8f9",
            "name": "Gamer Mouse",
            "description": "RGB optical mouse",
            "price_retail": "149.90",
            "price_reseller": "99.90",
            "image_url": null,
            "sku": "MOU-001",
            "category_id": GAMER_CATEGORY_ID,
        }
    ]))
    .into_response()
}

async fn profiles_get(State(state): State<Shared>, RawQuery(raw): RawQuery) -> impl IntoResponse {
    let query = parse_query(raw);
    let user_id = query
        .iter()
        .find(|(k, _)| k == "user_id")
        .map(|(_, v)| v.trim_start_matches("eq.").to_owned());

    let guard = state.lock().expect("mock state");
    let rows: Vec<Value> = match user_id {
        Some(id) => guard.profiles.get(&id).cloned().into_iter().collect(),
        None => guard.profiles.values().cloned().collect(),
    };
    Json(Value::Array(rows))
}

async fn spawn_mock(state: Shared) -> SocketAddr {
    async fn profiles_patch(
        State(state): State<Shared>,
        RawQuery(raw): RawQuery,
        Json(patch): Json<Value>,
    ) -> impl IntoResponse {
        let query = parse_query(raw);
        let user_id = query
            .iter()
            .find(|(k, _)| k == "user_id")
            .map(|(_, v)| v.trim_start_matches("eq.").to_owned());

        let mut guard = state.lock().expect("mock state");
        guard.last_profile_patch = Some(patch.clone());

        let rows: Vec<Value> = user_id
            .and_then(|id| {
                guard.profiles.get_mut(&id).map(|row| {
                    if let (Value::Object(target), Value::Object(fields)) = (&mut *row, &patch) {
                        for (k, v) in fields {
                            target.insert(k.clone(), v.clone());
                        }
                    }
                    row.clone()
                })
            })
            .into_iter()
            .collect();
        Json(Value::Array(rows))
    }

    async fn profiles_delete(
        State(state): State<Shared>,
        RawQuery(raw): RawQuery,
    ) -> impl IntoResponse {
        let query = parse_query(raw);
        let user_id = query
            .iter()
            .find(|(k, _)| k == "user_id")
            .map(|(_, v)| v.trim_start_matches("eq.").to_owned());

        let mut guard = state.lock().expect("mock state");
        if let Some(id) = user_id {
            guard.profiles.remove(&id);
        }
        Json(json!([]))
    }

    let app = Router::new()
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/signup", post(signup))
        .route("/auth/v1/user", get(user))
        .route("/auth/v1/admin/users/{user_id}", delete(admin_delete_user))
        .route("/rest/v1/categories", get(categories))
        .route("/rest/v1/products", get(products))
        .route(
            "/rest/v1/profiles",
            get(profiles_get)
                .patch(profiles_patch)
                .delete(profiles_delete),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock listener");
    let addr = listener.local_addr().expect("mock addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server");
    });
    addr
}

fn config_for(addr: SocketAddr) -> PlatformConfig {
    PlatformConfig::new(
        &format!("http://{addr}"),
        ANON_KEY.to_owned(),
        Some(secrecy::SecretString::from(SERVICE_KEY)),
    )
    .expect("valid mock config")
}

fn seed_profile(state: &Shared, sector: Sector) {
    state.lock().expect("mock state").profiles.insert(
        CLIENT_USER_ID.to_owned(),
        json!({
            "id": "d2719f10-3cc5-47e2-8d1a-5b6c7d8e9f01",
            "user_id": CLIENT_USER_ID,
            "email": "client@example.com",
            "phone": null,
            "sector": sector.as_str(),
            "is_admin": false,
            "is_blocked": false,
            "created_at": "2026-01-10T12:00:00Z",
            "updated_at": "2026-01-10T12:00:00Z",
        }),
    );
}

#[tokio::test]
async fn test_password_grant_roundtrip() {
    let state = Shared::default();
    let addr = spawn_mock(Arc::clone(&state)).await;
    let auth = AuthClient::new(&config_for(addr));

    let email = Email::parse("client@example.com").expect("valid email");
    let session = auth
        .sign_in_with_password(&email, "correct-horse")
        .await
        .expect("sign-in succeeds");

    assert_eq!(session.access_token, format!("access-{CLIENT_USER_ID}"));
    assert_eq!(session.user.email.as_deref(), Some("client@example.com"));

    let err = auth
        .sign_in_with_password(&email, "wrong")
        .await
        .expect_err("bad password rejected");
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_sign_up_pending_confirmation() {
    let state = Shared::default();
    let addr = spawn_mock(Arc::clone(&state)).await;
    let auth = AuthClient::new(&config_for(addr));

    let email = Email::parse("new@example.com").expect("valid email");
    let outcome = auth
        .sign_up(&email, "correct-horse", Sector::Reseller, Some("+5511988887777"))
        .await
        .expect("sign-up accepted");

    assert!(outcome.needs_confirmation());
}

#[tokio::test]
async fn test_current_user_with_stale_token_is_none() {
    let state = Shared::default();
    let addr = spawn_mock(Arc::clone(&state)).await;
    let auth = AuthClient::new(&config_for(addr));

    let identity = auth
        .current_user("stale-token")
        .await
        .expect("transport fine");
    assert!(identity.is_none());

    let identity = auth
        .current_user(&format!("access-{CLIENT_USER_ID}"))
        .await
        .expect("transport fine")
        .expect("live token resolves");
    assert_eq!(identity.id.to_string(), CLIENT_USER_ID);
}

#[tokio::test]
async fn test_list_products_encodes_combined_filters() {
    let state = Shared::default();
    let addr = spawn_mock(Arc::clone(&state)).await;
    let catalog = Catalog::new(RestClient::new(&config_for(addr)));

    let hits = catalog
        .list_products(&ProductFilter {
            text: Some("mouse".to_owned()),
            category_slug: Some("gamer".to_owned()),
        })
        .await
        .expect("listing succeeds");

    assert_eq!(hits.len(), 1);
    assert_eq!(hits.first().map(|p| p.name.as_str()), Some("Gamer Mouse"));

    let queries = state.lock().expect("mock state").product_queries.clone();
    let query = queries.first().expect("one products request");
    let get = |key: &str| {
        query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    };

    assert_eq!(
        get("or"),
        "(name.ilike.*mouse*,description.ilike.*mouse*)"
    );
    assert_eq!(get("category_id"), format!("eq.{GAMER_CATEGORY_ID}"));
    assert_eq!(get("order"), "name.asc");
    assert_eq!(get("limit"), "50");
}

#[tokio::test]
async fn test_unknown_category_slug_short_circuits_to_empty() {
    let state = Shared::default();
    let addr = spawn_mock(Arc::clone(&state)).await;
    let catalog = Catalog::new(RestClient::new(&config_for(addr)));

    let hits = catalog
        .list_products(&ProductFilter {
            text: None,
            category_slug: Some("no-such-category".to_owned()),
        })
        .await
        .expect("listing succeeds");

    assert!(hits.is_empty());
    // The products collection must not have been queried at all.
    assert!(state.lock().expect("mock state").product_queries.is_empty());
}

#[tokio::test]
async fn test_rate_limit_maps_to_retry_after() {
    let state = Shared::default();
    state.lock().expect("mock state").rate_limit_products = true;
    let addr = spawn_mock(Arc::clone(&state)).await;
    let catalog = Catalog::new(RestClient::new(&config_for(addr)));

    let err = catalog
        .list_products(&ProductFilter::default())
        .await
        .expect_err("rate limited");
    assert!(matches!(err, PlatformError::RateLimited(7)));
}

#[tokio::test]
async fn test_sector_change_patches_only_sector() {
    let state = Shared::default();
    seed_profile(&state, Sector::Retail);
    let addr = spawn_mock(Arc::clone(&state)).await;
    let config = config_for(addr);
    let profiles = ProfileStore::new(RestClient::new(&config), AuthClient::new(&config));

    let user_id: UserId = CLIENT_USER_ID.parse().expect("valid user id");
    let updated = profiles
        .set_sector(user_id, Sector::Reseller)
        .await
        .expect("sector update succeeds");

    assert_eq!(updated.sector, Sector::Reseller);
    let patch = state
        .lock()
        .expect("mock state")
        .last_profile_patch
        .clone()
        .expect("patch captured");
    assert_eq!(patch, json!({ "sector": "reseller" }));
}

#[tokio::test]
async fn test_delete_account_removes_identity_and_profile() {
    let state = Shared::default();
    seed_profile(&state, Sector::Retail);
    let addr = spawn_mock(Arc::clone(&state)).await;
    let config = config_for(addr);
    let auth = AuthClient::new(&config);
    let profiles = ProfileStore::new(RestClient::new(&config), auth.clone());

    let user_id: UserId = CLIENT_USER_ID.parse().expect("valid user id");
    profiles
        .delete_account(user_id)
        .await
        .expect("delete succeeds");

    // Subsequent fetches find neither profile nor identity.
    let profile = profiles.find_by_user(user_id).await.expect("fetch ok");
    assert!(profile.is_none());

    let identity = auth
        .current_user(&format!("access-{CLIENT_USER_ID}"))
        .await
        .expect("transport fine");
    assert!(identity.is_none());
}
