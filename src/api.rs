// 🌐 REST API - CLABE validation over HTTP (feature = "server")
//
// GET /api/health
// GET /api/banks?search=
// GET /api/banks/:code
// GET /api/clabe/:value
// GET /api/checksum/:prefix

use crate::clabe::{self, ClabeRecord};
use crate::entities::bank::{Bank, BankRegistry};
use crate::error::{DecodeError, DecodeErrorKind};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<BankRegistry>,
}

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    pub fn err(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            error: Some(message.into()),
        }
    }
}

/// Body of a rejected decode or checksum request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub kind: DecodeErrorKind,
    pub message: String,
}

impl From<&DecodeError> for ErrorDetail {
    fn from(e: &DecodeError) -> Self {
        ErrorDetail {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChecksumResponse {
    pub prefix: String,
    pub check_digit: String,
    pub clabe: String,
}

#[derive(Debug, Deserialize)]
pub struct BankQuery {
    pub search: Option<String>,
}

fn rejection(e: DecodeError) -> Response {
    let detail = ErrorDetail::from(&e);
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::err(detail, e.to_string())),
    )
        .into_response()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/banks - List the catalogue, optionally filtered by name
async fn list_banks(
    State(state): State<AppState>,
    Query(query): Query<BankQuery>,
) -> impl IntoResponse {
    let banks: Vec<Bank> = match query.search.as_deref() {
        Some(text) if !text.is_empty() => {
            state.registry.find_by_name(text).into_iter().cloned().collect()
        }
        _ => state.registry.banks().to_vec(),
    };

    Json(ApiResponse::ok(banks))
}

/// GET /api/banks/:code - Exact lookup by code
async fn get_bank(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    match state.registry.lookup(&code) {
        Some(bank) => (StatusCode::OK, Json(ApiResponse::ok(Some(bank.clone())))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Option<Bank>>::err(
                None,
                format!("unknown bank code {}", code),
            )),
        )
            .into_response(),
    }
}

/// GET /api/clabe/:value - Decode and validate a CLABE
async fn decode_clabe(State(state): State<AppState>, Path(value): Path<String>) -> Response {
    match state.registry.decode(&value) {
        Ok(clabe) => {
            let record: ClabeRecord = clabe.to_record();
            (StatusCode::OK, Json(ApiResponse::ok(record))).into_response()
        }
        Err(e) => {
            tracing::debug!(input = %value, error = %e, "rejected CLABE");
            rejection(e)
        }
    }
}

/// GET /api/checksum/:prefix - Check digit for 17 leading digits
async fn compute_checksum(Path(prefix): Path<String>) -> Response {
    match clabe::compute_checksum(&prefix) {
        Ok(digit) => {
            let response = ChecksumResponse {
                clabe: format!("{}{}", prefix, digit),
                check_digit: digit.to_string(),
                prefix,
            };
            (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
        }
        Err(e) => rejection(e),
    }
}

// ============================================================================
// Router
// ============================================================================

/// Build the application router over a bank registry
pub fn router(registry: BankRegistry) -> Router {
    let state = AppState {
        registry: Arc::new(registry),
    };

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/banks", get(list_banks))
        .route("/banks/:code", get(get_bank))
        .route("/clabe/:value", get(decode_clabe))
        .route("/checksum/:prefix", get(compute_checksum))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let app = router(BankRegistry::catalogue());
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "OK");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_decode_valid() {
        let (status, body) = get_json("/api/clabe/140180009000015533").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["bank"]["name"], "CONSUBANCO");
        assert_eq!(body["data"]["plaza_code"], "180");
        assert_eq!(body["data"]["account_number"], "00900001553");
        assert_eq!(body["data"]["check_digit"], "3");
    }

    #[tokio::test]
    async fn test_decode_rejections() {
        let cases = [
            ("/api/clabe/7invalid_clabe7", "malformed_input"),
            ("/api/clabe/999180009000015533", "unknown_bank_code"),
            ("/api/clabe/002010077777777779", "checksum_mismatch"),
        ];

        for (uri, kind) in cases {
            let (status, body) = get_json(uri).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
            assert_eq!(body["success"], false);
            assert_eq!(body["data"]["kind"], kind);
        }
    }

    #[tokio::test]
    async fn test_list_and_search_banks() {
        let (status, body) = get_json("/api/banks").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"].as_array().unwrap().len(),
            crate::entities::bank::CATALOGUE.len()
        );

        let (_, body) = get_json("/api/banks?search=santander").await;
        let found = body["data"].as_array().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["code"], "014");
    }

    #[tokio::test]
    async fn test_get_bank() {
        let (status, body) = get_json("/api/banks/002").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "BANAMEX");

        let (status, body) = get_json("/api/banks/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["data"], Value::Null);
        assert_eq!(body["error"], "unknown bank code 999");
    }

    #[tokio::test]
    async fn test_checksum() {
        let (status, body) = get_json("/api/checksum/01218000000000006").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["check_digit"], "0");
        assert_eq!(body["data"]["clabe"], "012180000000000060");

        let (status, body) = get_json("/api/checksum/123").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["data"]["kind"], "malformed_input");
    }
}
