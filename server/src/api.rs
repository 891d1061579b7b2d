//! HTTP routes, handlers and the OpenAPI document.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use fiatbridge_router::RouteReport;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::debug;
use utoipa::OpenApi;

use crate::{
    config::ServerConfig,
    dto::{ConvertRequest, ConvertRequestDoc, ConvertResponse, HealthResponse, ValidatedConversion},
    error::{ApiError, ApiResult, ErrorBody},
    metrics::MetricsSnapshot,
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/api/convert",
    request_body = ConvertRequestDoc,
    responses(
        (status = 200, description = "Best conversion found", body = ConvertResponse),
        (status = 400, description = "Invalid request fields, keyed by field name"),
        (status = 404, description = "No intermediary can price the conversion", body = ErrorBody)
    )
)]
async fn convert(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ConvertRequest>, JsonRejection>,
) -> ApiResult<Json<ConvertResponse>> {
    let request = accept(&state, payload)?;

    match state
        .router
        .get_best_conversion(&request.from, &request.to, request.amount)
        .await
    {
        Some(result) => {
            state.metrics.conversion_found();
            Ok(Json(result.into()))
        }
        None => {
            state.metrics.conversion_not_found();
            Err(ApiError::NoConversionPath)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/convert/report",
    request_body = ConvertRequestDoc,
    responses(
        (status = 200, description = "Every candidate with its outcome and the best one, if any"),
        (status = 400, description = "Invalid request fields, keyed by field name")
    )
)]
async fn convert_report(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ConvertRequest>, JsonRejection>,
) -> ApiResult<Json<RouteReport>> {
    let request = accept(&state, payload)?;

    let report = state
        .router
        .evaluate(&request.from, &request.to, request.amount)
        .await;

    if report.best.is_some() {
        state.metrics.conversion_found();
    } else {
        state.metrics.conversion_not_found();
    }

    Ok(Json(report))
}

/// Count the request and turn a body into a validated conversion.
fn accept(
    state: &AppState,
    payload: Result<Json<ConvertRequest>, JsonRejection>,
) -> ApiResult<ValidatedConversion> {
    state.metrics.request_received();

    let Json(request) = payload.map_err(|rejection| {
        state.metrics.request_rejected();
        debug!(error = %rejection, "Unreadable request body");
        ApiError::BadRequest(rejection.body_text())
    })?;

    request.validate().map_err(|errors| {
        state.metrics.request_rejected();
        debug!(fields = ?errors.keys().collect::<Vec<_>>(), "Request failed validation");
        ApiError::Validation(errors)
    })
}

#[utoipa::path(get, path = "/api/health", responses((status = 200, body = HealthResponse)))]
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        source: state.router.source_name().to_string(),
        fiats: state
            .router
            .config()
            .fiats
            .iter()
            .map(|f| f.to_string())
            .collect(),
    })
}

#[utoipa::path(get, path = "/api/metrics", responses((status = 200, body = MetricsSnapshot)))]
async fn metrics(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

#[derive(OpenApi)]
#[openapi(
    paths(convert, convert_report, health, metrics),
    components(schemas(
        ConvertRequestDoc,
        ConvertResponse,
        ErrorBody,
        HealthResponse,
        MetricsSnapshot
    )),
    tags((name = "fiatbridge"))
)]
pub struct ApiDoc;

pub fn app_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let openapi = ApiDoc::openapi();

    let api = Router::new()
        .route("/convert", post(convert))
        .route("/convert/report", post(convert_report))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/openapi.json", get(|| async { Json(openapi) }));

    Router::new()
        .nest("/api", api)
        .with_state(state)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
