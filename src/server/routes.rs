//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::catalog::PointOfInterest;
use crate::error::Error;
use crate::pins::NearbyPin;
use crate::server::state::AppState;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/readyz", get(ready_handler))
        .route("/pins", get(nearby_handler).post(create_pin_handler))
        .route("/search", get(search_handler))
        .fallback(not_found_handler)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// JSON body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// API error response
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, error: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.to_string(),
                message: message.into(),
            },
        }
    }

    /// A 400 carrying the validation message verbatim
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "ValidationError", message)
    }

    /// Map a core error, hiding internal detail behind `public_message`
    pub fn from_core(err: Error, public_message: &str) -> Self {
        if err.is_validation() {
            return Self::validation(err.to_string());
        }
        error!("{}: {}", public_message, err);
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "InternalServerError",
            public_message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Create pin request body
#[derive(Debug, Deserialize)]
pub struct CreatePinRequest {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

/// Create pin response body
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePinResponse {
    pub id: String,
    pub status: String,
}

/// Create a pin
///
/// POST /pins
async fn create_pin_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreatePinRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatePinResponse>), ApiError> {
    const FAILURE: &str = "Failed to create pin";

    let Json(req) = payload.map_err(|rejection| ApiError::validation(rejection.body_text()))?;

    // File-backed stores write to disk on create
    let pins = Arc::clone(&state.pins);
    let pin = tokio::task::spawn_blocking(move || pins.create(&req.name, req.lat, req.lng))
        .await
        .map_err(|e| ApiError::from_core(Error::Internal(e.to_string()), FAILURE))?
        .map_err(|e| ApiError::from_core(e, FAILURE))?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePinResponse {
            id: pin.id,
            status: "created".to_string(),
        }),
    ))
}

/// Raw query-string pairs in request order
type QueryPairs = Vec<(String, String)>;

/// First value given for `key`; repeats of a key are ignored
fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

/// Nearby query parameters
#[derive(Debug, Default)]
pub struct NearbyParams {
    pub near: Option<String>,
    pub radius: Option<String>,
}

impl From<QueryPairs> for NearbyParams {
    fn from(pairs: QueryPairs) -> Self {
        Self {
            near: first_value(&pairs, "near"),
            radius: first_value(&pairs, "radius"),
        }
    }
}

/// Pins within a radius, nearest first
///
/// GET /pins?near=lat,lng&radius=meters
async fn nearby_handler(
    State(state): State<Arc<AppState>>,
    params: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<Vec<NearbyPin>>, ApiError> {
    let Query(pairs) = params.map_err(|rejection| ApiError::validation(rejection.body_text()))?;
    let params = NearbyParams::from(pairs);

    state
        .pins
        .nearby(params.near.as_deref(), params.radius.as_deref())
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "Failed to fetch nearby pins"))
}

/// Search query parameters
#[derive(Debug, Default)]
pub struct SearchParams {
    pub q: Option<String>,
}

impl From<QueryPairs> for SearchParams {
    fn from(pairs: QueryPairs) -> Self {
        Self {
            q: first_value(&pairs, "q"),
        }
    }
}

/// Search the point-of-interest catalog
///
/// GET /search?q=text
async fn search_handler(
    State(state): State<Arc<AppState>>,
    params: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<Vec<PointOfInterest>>, ApiError> {
    let Query(pairs) = params.map_err(|rejection| ApiError::validation(rejection.body_text()))?;
    let params = SearchParams::from(pairs);

    state
        .catalog
        .search(params.q.as_deref().unwrap_or_default())
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "Failed to search POIs"))
}

/// Liveness probe
///
/// GET /healthz
async fn health_handler() -> &'static str {
    "ok"
}

/// Readiness probe; fails if the pin store is unusable
///
/// GET /readyz
async fn ready_handler(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    match state.pins.len() {
        Ok(_) => (StatusCode::OK, "ready"),
        Err(e) => {
            error!("Readiness check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "not ready")
        }
    }
}

async fn not_found_handler() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "NotFound", "Route not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogSearchIndex;
    use crate::pins::storage::PinRepository;
    use crate::pins::{Pin, PinStore};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn create_test_state() -> Arc<AppState> {
        Arc::new(AppState::in_memory())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn error_body(bytes: &[u8]) -> ErrorBody {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let state = create_test_state();

        let (status, body) = send(create_router(state.clone()), get("/healthz")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");

        let (status, body) = send(create_router(state), get("/readyz")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ready");
    }

    #[tokio::test]
    async fn test_ready_fails_when_store_is_unusable() {
        let state = create_test_state();
        state.pins.poison_index();

        let (status, body) = send(create_router(state.clone()), get("/readyz")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, b"not ready");

        let (status, body) = send(create_router(state), get("/healthz")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn test_create_pin() {
        let state = create_test_state();
        let app = create_router(state.clone());

        let request = post_json(
            "/pins",
            serde_json::json!({ "name": "Test Pin", "lat": 40.7128, "lng": -74.0060 }),
        );
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::CREATED);
        let created: CreatePinResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(created.status, "created");
        assert!(state.pins.get(&created.id).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_pin_invalid_latitude() {
        let state = create_test_state();

        let request = post_json(
            "/pins",
            serde_json::json!({ "name": "Test Pin", "lat": 91, "lng": -74.0060 }),
        );
        let (status, body) = send(create_router(state.clone()), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err = error_body(&body);
        assert_eq!(err.error, "ValidationError");
        assert_eq!(err.message, "Latitude must be between -90 and 90");
        assert!(state.pins.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_create_pin_malformed_body() {
        let app = create_router(create_test_state());

        let request = post_json("/pins", serde_json::json!({ "name": "No coords" }));
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err = error_body(&body);
        assert_eq!(err.error, "ValidationError");
        assert!(!err.message.is_empty());
    }

    #[tokio::test]
    async fn test_create_then_query_nearby() {
        let state = create_test_state();

        let request = post_json(
            "/pins",
            serde_json::json!({ "name": "Test Pin", "lat": 40.7128, "lng": -74.0060 }),
        );
        let (status, body) = send(create_router(state.clone()), request).await;
        assert_eq!(status, StatusCode::CREATED);
        let created: CreatePinResponse = serde_json::from_slice(&body).unwrap();

        let (status, body) = send(
            create_router(state),
            get("/pins?near=40.7128,-74.0060&radius=1000"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let pins: Vec<NearbyPin> = serde_json::from_slice(&body).unwrap();
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0].id, created.id);
        assert_eq!(pins[0].name, "Test Pin");
        assert!(pins[0].distance_m.abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_nearby_response_shape() {
        let state = create_test_state();
        state.pins.create("Shape", 10.0, 20.0).unwrap();

        let (_, body) = send(create_router(state), get("/pins?near=10,20&radius=5")).await;
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let first = value[0].as_object().unwrap();

        let mut keys: Vec<&str> = first.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["distance_m", "id", "lat", "lng", "name"]);
    }

    #[tokio::test]
    async fn test_nearby_missing_parameters() {
        let state = create_test_state();

        for uri in ["/pins", "/pins?near=40.7128,-74.0060", "/pins?radius=1000"] {
            let (status, body) = send(create_router(state.clone()), get(uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            let err = error_body(&body);
            assert_eq!(err.error, "ValidationError");
            assert_eq!(err.message, "Missing required parameters: near and radius");
        }
    }

    #[tokio::test]
    async fn test_nearby_radius_bounds() {
        let state = create_test_state();

        for radius in ["0", "10001"] {
            let uri = format!("/pins?near=40.7128,-74.0060&radius={}", radius);
            let (status, body) = send(create_router(state.clone()), get(&uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(
                error_body(&body).message,
                "Radius must be a number between 1 and 10000 meters"
            );
        }

        for radius in ["1", "10000"] {
            let uri = format!("/pins?near=40.7128,-74.0060&radius={}", radius);
            let (status, _) = send(create_router(state.clone()), get(&uri)).await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_nearby_bad_near() {
        let (status, body) = send(
            create_router(create_test_state()),
            get("/pins?near=40.7128&radius=100"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            error_body(&body).message,
            "Near parameter must be in format lat,lng"
        );
    }

    #[tokio::test]
    async fn test_nearby_repeated_keys_use_first_value() {
        let state = create_test_state();
        let pin = state.pins.create("First", 1.0, 2.0).unwrap();

        let (status, body) = send(
            create_router(state.clone()),
            get("/pins?near=1,2&near=50,60&radius=10&radius=0"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let pins: Vec<NearbyPin> = serde_json::from_slice(&body).unwrap();
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0].id, pin.id);

        let (status, body) = send(
            create_router(state),
            get("/pins?near=1,2&near=3,4&radius=0&radius=10"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            error_body(&body).message,
            "Radius must be a number between 1 and 10000 meters"
        );
    }

    #[tokio::test]
    async fn test_search_repeated_key_uses_first_value() {
        let state = create_test_state();

        let (status, body) = send(
            create_router(state.clone()),
            get("/search?q=coffee&q=park"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let results: Vec<PointOfInterest> = serde_json::from_slice(&body).unwrap();
        assert_eq!(results.len(), 2);

        let (status, body) = send(create_router(state), get("/search?q=&q=coffee")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            error_body(&body).message,
            "Search query is required and must not be empty"
        );
    }

    #[tokio::test]
    async fn test_search() {
        let app = create_router(create_test_state());

        let (status, body) = send(app, get("/search?q=COFFEE")).await;
        assert_eq!(status, StatusCode::OK);

        let results: Vec<PointOfInterest> = serde_json::from_slice(&body).unwrap();
        let names: Vec<&str> = results.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Starbucks Coffee", "Dunkin' Donuts"]);
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let state = create_test_state();

        for uri in ["/search", "/search?q=", "/search?q=%20%20"] {
            let (status, body) = send(create_router(state.clone()), get(uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(
                error_body(&body).message,
                "Search query is required and must not be empty"
            );
        }
    }

    #[tokio::test]
    async fn test_not_found() {
        let (status, body) = send(create_router(create_test_state()), get("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let err = error_body(&body);
        assert_eq!(err.error, "NotFound");
        assert_eq!(err.message, "Route not found");
    }

    struct BrokenRepository;

    impl PinRepository for BrokenRepository {
        fn name(&self) -> &str {
            "broken"
        }

        fn load_all(&self) -> crate::error::Result<Vec<Pin>> {
            Ok(Vec::new())
        }

        fn insert(&mut self, _pin: &Pin) -> crate::error::Result<()> {
            Err(Error::Storage("connection refused at 10.0.0.5".to_string()))
        }
    }

    #[tokio::test]
    async fn test_storage_failure_hides_detail() {
        let store = PinStore::open(Box::new(BrokenRepository)).unwrap();
        let state = Arc::new(AppState::new(store, CatalogSearchIndex::builtin()));

        let request = post_json(
            "/pins",
            serde_json::json!({ "name": "Test Pin", "lat": 1.0, "lng": 2.0 }),
        );
        let (status, body) = send(create_router(state), request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let err = error_body(&body);
        assert_eq!(err.error, "InternalServerError");
        assert_eq!(err.message, "Failed to create pin");
    }
}
