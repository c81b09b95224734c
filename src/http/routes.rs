//! HTTP route definitions

use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};
use tracing::{debug, info};

use crate::analysis::{InventorySummary, LOW_STOCK_THRESHOLD};
use crate::app::AppState;
use crate::reconcile::{
    reconcile, ReconcileError, ReconciliationReport, ScenePredictions, ThresholdPolicy,
    DEFAULT_CONFIDENCE_THRESHOLD,
};
use crate::store::{
    CreateItemRequest, InventoryError, InventoryItem, UpdateItemRequest, ValidationError,
};
use crate::util::parse::parse_int_prefix;
use crate::util::time::uptime_secs;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.public_dir);

    let api_routes = Router::new()
        .route("/inventory", get(list_items_handler).post(create_item_handler))
        .route("/inventory/summary", get(summary_handler))
        .route(
            "/inventory/:id",
            put(update_item_handler).delete(delete_item_handler),
        )
        .route("/reconcile", post(reconcile_handler));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_routes)
        .fallback_service(static_files)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Parse a write body; no JSON content type or a blank body counts as `{}`
fn json_body(headers: &HeaderMap, body: &Bytes) -> Result<Value, AppError> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
        .unwrap_or(false);

    if !is_json || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }

    serde_json::from_slice(body).map_err(|e| {
        AppError::BadRequest(format!("Failed to parse the request body as JSON: {e}"))
    })
}

fn decode_body<T: DeserializeOwned>(body: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(body)
}

fn invalid_body(err: serde_json::Error) -> AppError {
    AppError::BadRequest(format!(
        "Failed to deserialize the JSON body into the target type: {err}"
    ))
}

/// Path ids parse leniently; anything that is not a non-negative integer matches no item
fn parse_item_id(raw: &str) -> Result<u64, AppError> {
    parse_int_prefix(raw)
        .and_then(|id| u64::try_from(id).ok())
        .ok_or_else(|| AppError::NotFound(InventoryError::NotFound(0).to_string()))
}

// ============================================================================
// Health endpoint
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    item_count: usize,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: uptime_secs(),
        item_count: state.inventory_store.len(),
    })
}

// ============================================================================
// Inventory endpoints
// ============================================================================

async fn list_items_handler(State(state): State<AppState>) -> Json<Vec<InventoryItem>> {
    Json(state.inventory_store.list())
}

async fn create_item_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<InventoryItem>), AppError> {
    let body = json_body(&headers, &body)?;
    let request: CreateItemRequest = decode_body(body).map_err(invalid_body)?;
    let item = state.inventory_store.create(request)?;

    info!(id = item.id, name = %item.name, "Item created");
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_item_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<InventoryItem>, AppError> {
    let id = parse_item_id(&id)?;
    let body = json_body(&headers, &body)?;

    // An unknown id wins over a badly typed body.
    let request: UpdateItemRequest = match decode_body(body) {
        Ok(request) => request,
        Err(_) if !state.inventory_store.contains(id) => {
            return Err(InventoryError::NotFound(id).into());
        }
        Err(e) => return Err(invalid_body(e)),
    };
    let item = state.inventory_store.update(id, request)?;

    info!(id, "Item updated");
    Ok(Json(item))
}

#[derive(Serialize)]
struct DeleteResponse {
    message: &'static str,
    item: InventoryItem,
}

async fn delete_item_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_item_id(&id)?;
    let item = state.inventory_store.delete(id)?;

    info!(id, "Item deleted");
    Ok(Json(DeleteResponse {
        message: "Item deleted successfully.",
        item,
    }))
}

// ============================================================================
// Analysis & reconciliation endpoints
// ============================================================================

#[derive(Deserialize)]
struct SummaryQuery {
    low_stock_threshold: Option<i64>,
}

async fn summary_handler(
    State(state): State<AppState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<InventorySummary>, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let threshold = query.low_stock_threshold.unwrap_or(LOW_STOCK_THRESHOLD);

    let items = state.inventory_store.list();
    Ok(Json(InventorySummary::from_items(&items, threshold)))
}

#[derive(Deserialize)]
struct ReconcileRequest {
    predictions: Vec<ScenePredictions>,
    #[serde(default)]
    threshold: Option<f64>,
}

async fn reconcile_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReconcileRequest>, JsonRejection>,
) -> Result<Json<ReconciliationReport>, AppError> {
    let Json(request) = payload?;
    let policy = ThresholdPolicy::new(request.threshold.unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD))?;

    let outcome = policy.apply(&request.predictions);
    let items = state.inventory_store.list();
    let report = reconcile(&outcome, &items, policy.threshold());

    info!(
        scenes = request.predictions.len(),
        verified = report.summary.verified_count,
        discrepancies = report.summary.discrepancy_count,
        uncertain = report.summary.uncertain_count,
        missing = report.summary.missing_from_db_count,
        "Reconciliation complete"
    );
    Ok(Json(report))
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::Validation(e) => e.into(),
            not_found @ InventoryError::NotFound(_) => AppError::NotFound(not_found.to_string()),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<ReconcileError> for AppError {
    fn from(err: ReconcileError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        debug!(error = %self, "Request rejected");

        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_ids_parse_leniently() {
        assert_eq!(parse_item_id("2").unwrap(), 2);
        assert_eq!(parse_item_id("2abc").unwrap(), 2);
        assert!(matches!(parse_item_id("abc"), Err(AppError::NotFound(_))));
        assert!(matches!(parse_item_id("-1"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn not_found_message_matches_api() {
        let err: AppError = InventoryError::NotFound(7).into();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Item not found."));
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let err: AppError = InventoryError::Validation(ValidationError::MissingFields).into();
        assert!(matches!(
            err,
            AppError::BadRequest(ref msg) if msg == "name, quantity, category, and status are required."
        ));
    }
}
