use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use prime_common::{ListingPatch, ListingQuery, NewListing};
use serde::Deserialize;

use super::mint::MintOutcome;
use super::service::Inventory;
use crate::errors::InventoryError;

/// Shown to users when mirror generation runs out of attempts.
pub const EXHAUSTED_MESSAGE: &str = "Failed to generate unique number. Please try again.";

// ── Shared application state ──────────────────────────────────────────

pub struct AppState {
    pub inventory: Inventory,
}

pub type SharedState = Arc<AppState>;

// ── Request payload types ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PromoRequest {
    pub ids: Vec<i64>,
}

// ── Error handling ────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unavailable(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(serde_json::json!({"error": message}))).into_response()
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::ListingNotFound { .. } => ApiError::NotFound(err.to_string()),
            e if e.is_client_error() => ApiError::BadRequest(e.to_string()),
            e => {
                tracing::error!(error = %e, "Request failed");
                ApiError::Internal(e.to_string())
            }
        }
    }
}

// ── Router ────────────────────────────────────────────────────────────

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/api/phones", get(list_phones).post(create_phone))
        .route(
            "/api/phones/{id}",
            get(get_phone).patch(update_phone).delete(delete_phone),
        )
        .route("/api/phones/{id}/sold", post(mark_sold))
        .route("/api/mirror", get(mirror_history).post(mint_mirror))
        .route("/api/promo", post(promo_sheet))
        .route("/health", get(health_check))
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn health_check() -> &'static str {
    "ok"
}

async fn list_phones(
    State(state): State<SharedState>,
    Query(query): Query<ListingQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let listings = state.inventory.list_listings(&query).await?;
    Ok(Json(listings))
}

async fn create_phone(
    State(state): State<SharedState>,
    Json(req): Json<NewListing>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state.inventory.add_listing(req).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

async fn get_phone(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state.inventory.get_listing(id).await?;
    Ok(Json(listing))
}

async fn update_phone(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(patch): Json<ListingPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state.inventory.update_listing(id, patch).await?;
    Ok(Json(listing))
}

async fn mark_sold(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state.inventory.mark_sold(id).await?;
    Ok(Json(listing))
}

async fn delete_phone(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.inventory.delete_listing(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn mint_mirror(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    match state.inventory.mint_mirror().await? {
        MintOutcome::Minted { record } => Ok((StatusCode::CREATED, Json(record))),
        MintOutcome::Exhausted { .. } => Err(ApiError::Unavailable(EXHAUSTED_MESSAGE.to_string())),
    }
}

async fn mirror_history(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let history = state.inventory.mirror_history().await?;
    Ok(Json(history))
}

async fn promo_sheet(
    State(state): State<SharedState>,
    Json(req): Json<PromoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let sheet = state.inventory.promo_sheet(req.ids).await?;
    Ok(Json(sheet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::db::InventoryDb;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use prime_common::MirrorGenerator;
    use tower::ServiceExt;

    fn test_app_with(generator: MirrorGenerator) -> Router {
        let inventory = Inventory::new(InventoryDb::new_in_memory().unwrap(), generator, 10);
        let state = Arc::new(AppState { inventory });
        api_router().with_state(state)
    }

    fn test_app() -> Router {
        test_app_with(MirrorGenerator::default())
    }

    async fn body_json<T: serde::de::DeserializeOwned>(body: Body) -> T {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn create(app: &Router, phone: &str, price: f64, postpaid: bool) -> serde_json::Value {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/phones",
                serde_json::json!({"phone_number": phone, "price": price, "postpaid_only": postpaid}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response.into_body()).await
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = test_app();
        let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_list_phones_empty() {
        let app = test_app();
        let response = app.oneshot(empty_request("GET", "/api/phones")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let phones: Vec<serde_json::Value> = body_json(response.into_body()).await;
        assert!(phones.is_empty());
    }

    #[tokio::test]
    async fn test_create_and_get_phone() {
        let app = test_app();
        let created = create(&app, "7771234", 1500.0, true).await;
        assert_eq!(created["phone_number"], "7771234");
        assert_eq!(created["postpaid_only"], true);
        assert_eq!(created["sold"], false);

        let id = created["id"].as_i64().unwrap();
        let response = app
            .oneshot(empty_request("GET", &format!("/api/phones/{}", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let fetched: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(fetched["price"], 1500.0);
    }

    #[tokio::test]
    async fn test_create_phone_rejects_missing_price() {
        let app = test_app();
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/phones",
                serde_json::json!({"phone_number": "7771234", "price": 0}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = body_json(response.into_body()).await;
        assert!(body["error"].as_str().unwrap().contains("Price"));
    }

    #[tokio::test]
    async fn test_get_missing_phone_is_404() {
        let app = test_app();
        let response = app
            .oneshot(empty_request("GET", "/api/phones/999"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_phones_with_filters() {
        let app = test_app();
        create(&app, "7770001", 300.0, false).await;
        create(&app, "7770002", 100.0, true).await;
        create(&app, "9990003", 200.0, true).await;

        let response = app
            .oneshot(empty_request(
                "GET",
                "/api/phones?postpaid_only=true&sort=price-high&search=0",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let phones: Vec<serde_json::Value> = body_json(response.into_body()).await;
        let numbers: Vec<&str> = phones
            .iter()
            .map(|p| p["phone_number"].as_str().unwrap())
            .collect();
        assert_eq!(numbers, vec!["9990003", "7770002"]);
    }

    #[tokio::test]
    async fn test_patch_and_mark_sold() {
        let app = test_app();
        let created = create(&app, "7771234", 1500.0, false).await;
        let id = created["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "PATCH",
                &format!("/api/phones/{}", id),
                serde_json::json!({"price": 1750.5}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(updated["price"], 1750.5);
        assert_eq!(updated["sold"], false);

        let response = app
            .oneshot(empty_request("POST", &format!("/api/phones/{}/sold", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let sold: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(sold["sold"], true);
    }

    #[tokio::test]
    async fn test_empty_patch_is_bad_request() {
        let app = test_app();
        let created = create(&app, "7771234", 1500.0, false).await;
        let id = created["id"].as_i64().unwrap();

        let response = app
            .oneshot(json_request(
                "PATCH",
                &format!("/api/phones/{}", id),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_phone() {
        let app = test_app();
        let created = create(&app, "7771234", 1500.0, false).await;
        let uri = format!("/api/phones/{}", created["id"]);

        let response = app.clone().oneshot(empty_request("DELETE", &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.oneshot(empty_request("DELETE", &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_mint_mirror_and_history() {
        let app = test_app();
        let response = app
            .clone()
            .oneshot(empty_request("POST", "/api/mirror"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let record: serde_json::Value = body_json(response.into_body()).await;
        let code = record["mirror_number"].as_str().unwrap().to_string();
        assert!(prime_common::mirror::is_mirror_code(&code));

        let response = app.oneshot(empty_request("GET", "/api/mirror")).await.unwrap();
        let history: Vec<serde_json::Value> = body_json(response.into_body()).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["mirror_number"], code.as_str());
    }

    #[tokio::test]
    async fn test_mint_mirror_exhausted_is_503() {
        let app = test_app_with(MirrorGenerator::with_max_attempts(0));
        let response = app.oneshot(empty_request("POST", "/api/mirror")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(body["error"], EXHAUSTED_MESSAGE);
    }

    #[tokio::test]
    async fn test_promo_sheet() {
        let app = test_app();
        let a = create(&app, "7770001", 1000.0, false).await;
        let b = create(&app, "7770002", 2500.0, false).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/promo",
                serde_json::json!({"ids": [b["id"], a["id"]]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let sheet: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(sheet["title"], "Prime Numbers");
        assert_eq!(sheet["entries"][0]["phone_number"], "7770002");
        assert_eq!(sheet["entries"][0]["price_label"], "MVR 2,500.00");

        let too_many: Vec<i64> = (1..=11).collect();
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/promo",
                serde_json::json!({ "ids": too_many }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
