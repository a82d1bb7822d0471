use crate::infra::{parse_collection, AppState, StagedReferenceUnit};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use research_match::error::AppError;
use research_match::forms::field::{FieldReader, TextRule};
use research_match::forms::{form_router, FieldErrors, FormInput, FormService};
use research_match::reference::{ReferenceCatalog, ReferenceCollection, ReferenceError};
use research_match::responder;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub(crate) const REFERENCE_LABEL: &str = "label";
const REFERENCE_LABEL_MAX: usize = 100;

#[derive(Debug, Serialize)]
pub(crate) struct StagedReferenceResponse {
    pub(crate) collection: ReferenceCollection,
    pub(crate) label: String,
    pub(crate) pending: usize,
}

/// Form routes plus the operational and reference-data endpoints, with the
/// not-found page as fallback.
pub(crate) fn with_service_routes<C>(service: Arc<FormService<C>>) -> Router
where
    C: ReferenceCatalog + 'static,
{
    form_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/reference/:collection",
            post(stage_reference_endpoint),
        )
        .fallback(responder::not_found_handler)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Stages a reference row in the request's unit of work. The row becomes
/// visible to forms once the request commits.
pub(crate) async fn stage_reference_endpoint(
    Path(collection): Path<String>,
    Extension(unit): Extension<Arc<StagedReferenceUnit>>,
    Json(input): Json<FormInput>,
) -> Response {
    let Ok(collection) = parse_collection(&collection) else {
        return responder::not_found();
    };

    let mut reader = FieldReader::new(&input);
    let label = reader.text(REFERENCE_LABEL, &[TextRule::MaxLength(REFERENCE_LABEL_MAX)]);
    if let Err(errors) = reader.finish() {
        return rejected(StatusCode::UNPROCESSABLE_ENTITY, errors);
    }

    match unit.stage(collection, &label) {
        Ok(()) => {
            info!(collection = collection.label(), %label, "reference row staged");
            let body = StagedReferenceResponse {
                collection,
                label: label.trim().to_string(),
                pending: unit.pending(),
            };
            (StatusCode::CREATED, Json(body)).into_response()
        }
        Err(err @ ReferenceError::DuplicateLabel { .. }) => {
            let mut errors = FieldErrors::new();
            errors.push(REFERENCE_LABEL, err.to_string());
            rejected(StatusCode::CONFLICT, errors)
        }
        Err(err) => AppError::from(err).into_response(),
    }
}

fn rejected(status: StatusCode, errors: FieldErrors) -> Response {
    (status, Json(json!({ "accepted": false, "errors": errors }))).into_response()
}
