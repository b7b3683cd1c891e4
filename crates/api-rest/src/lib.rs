//! # API REST
//!
//! REST API implementation for medrec.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON envelopes, status mapping, CORS)
//!
//! Uses `api-shared` for the wire types and `medrec-core` for the record
//! operations. The router is built once here and reused by both the
//! standalone `medrec-api-rest` binary and the workspace `medrec-run`
//! binary.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path as AxumPath, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::record::{MedicalRecord, RecordDraft, RecordPatch, RecordSource, RecordType};
use api_shared::wire::{
    CreateRecordRes, DeleteRecordQuery, DeleteRecordRes, ErrorRes, GetRecordRes, HealthRes,
    ListRecordsQuery, ListRecordsRes, UpdateRecordReq, UpdateRecordRes,
};
use api_shared::HealthService;
use medrec_core::{RecordError, RecordFilter, RecordService};

/// Application state for the REST API.
///
/// Contains shared state that needs to be accessible to all request
/// handlers, currently the [`RecordService`] instance for record operations.
#[derive(Clone)]
pub struct AppState {
    pub record_service: Arc<RecordService>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_records,
        get_record,
        create_record,
        update_record,
        delete_record,
    ),
    components(schemas(
        MedicalRecord,
        RecordType,
        RecordSource,
        RecordDraft,
        RecordPatch,
        UpdateRecordReq,
        ListRecordsRes,
        GetRecordRes,
        CreateRecordRes,
        UpdateRecordRes,
        DeleteRecordRes,
        ErrorRes,
        HealthRes,
    ))
)]
struct ApiDoc;

/// Builds the REST router, including Swagger UI and a permissive CORS layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/medical-records", get(list_records))
        .route("/medical-records", post(create_record))
        .route("/medical-records", patch(update_record))
        .route("/medical-records", delete(delete_record))
        .route("/medical-records/:id", get(get_record))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Maps a record error onto the HTTP status and failure body for the caller.
///
/// Caller errors keep their stable message; persistence failures are logged
/// and collapsed into a generic 500 so internals never leak to the wire.
fn failure(operation: &str, e: RecordError) -> (StatusCode, Json<ErrorRes>) {
    let status = match &e {
        RecordError::MissingFields(_) | RecordError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        RecordError::NotFound(_) => StatusCode::NOT_FOUND,
        RecordError::DuplicateId(_) => StatusCode::CONFLICT,
        RecordError::Serialization(_) | RecordError::Deserialization(_) | RecordError::Store(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("{operation} error: {e:?}");
        (status, Json(ErrorRes::new(format!("Failed to {operation}"))))
    } else {
        (status, Json(ErrorRes::new(e.to_string())))
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns the current health status of the medrec service.
/// This endpoint is used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/medical-records",
    params(ListRecordsQuery),
    responses(
        (status = 200, description = "Matching records, most recent first", body = ListRecordsRes)
    )
)]
/// List medical records
///
/// Applies the supplied exact-match filters as a conjunction and returns the
/// matching records sorted by clinical date, most recent first. An unreadable
/// record collection degrades to an empty result rather than an error.
#[axum::debug_handler]
async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<ListRecordsQuery>,
) -> Json<ListRecordsRes> {
    let filter: RecordFilter = query.into();
    let records = state.record_service.list_records(&filter);

    Json(ListRecordsRes {
        success: true,
        count: records.len(),
        records,
    })
}

#[utoipa::path(
    get,
    path = "/medical-records/{id}",
    params(("id" = String, Path, description = "Record identifier")),
    responses(
        (status = 200, description = "Record found", body = GetRecordRes),
        (status = 404, description = "No record with this id", body = ErrorRes)
    )
)]
/// Fetch one medical record by id
///
/// Consults the single-record cache first; a hit is served without touching
/// persistence and tagged `source: "cache"`. A miss reads the collection and
/// tags the response `source: "database"`.
#[axum::debug_handler]
async fn get_record(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<GetRecordRes>, (StatusCode, Json<ErrorRes>)> {
    match state.record_service.get_record(&id) {
        Ok(fetched) => Ok(Json(GetRecordRes {
            success: true,
            record: fetched.record,
            source: fetched.source,
        })),
        Err(e) => Err(failure("fetch medical record", e)),
    }
}

#[utoipa::path(
    post,
    path = "/medical-records",
    request_body = RecordDraft,
    responses(
        (status = 201, description = "Record created", body = CreateRecordRes),
        (status = 400, description = "Required fields missing", body = ErrorRes),
        (status = 409, description = "Supplied id already exists", body = ErrorRes),
        (status = 500, description = "Persistence failure", body = ErrorRes)
    )
)]
/// Create a medical record
///
/// Requires `title`, `type`, `doctorName` and `patientEmail`; every missing
/// field is reported in one response. The stored record is returned with its
/// assigned id and creation stamp.
#[axum::debug_handler]
async fn create_record(
    State(state): State<AppState>,
    Json(draft): Json<RecordDraft>,
) -> Result<(StatusCode, Json<CreateRecordRes>), (StatusCode, Json<ErrorRes>)> {
    match state.record_service.create_record(draft) {
        Ok(record) => Ok((
            StatusCode::CREATED,
            Json(CreateRecordRes {
                success: true,
                message: "Medical record created successfully".into(),
                record,
            }),
        )),
        Err(e) => Err(failure("create medical record", e)),
    }
}

#[utoipa::path(
    patch,
    path = "/medical-records",
    request_body = UpdateRecordReq,
    responses(
        (status = 200, description = "Record updated", body = UpdateRecordRes),
        (status = 400, description = "Missing record id", body = ErrorRes),
        (status = 404, description = "No record with this id", body = ErrorRes),
        (status = 500, description = "Persistence failure", body = ErrorRes)
    )
)]
/// Update a medical record
///
/// The body names the target `id` plus the fields to change; `id` and
/// `createdAt` themselves cannot be changed. `updatedAt` is stamped on every
/// successful update.
#[axum::debug_handler]
async fn update_record(
    State(state): State<AppState>,
    Json(req): Json<UpdateRecordReq>,
) -> Result<Json<UpdateRecordRes>, (StatusCode, Json<ErrorRes>)> {
    let Some(id) = req.id.filter(|id| !id.trim().is_empty()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorRes::new("Medical record ID is required")),
        ));
    };

    match state.record_service.update_record(&id, req.patch) {
        Ok(record) => Ok(Json(UpdateRecordRes {
            success: true,
            message: "Medical record updated successfully".into(),
            record,
        })),
        Err(e) => Err(failure("update medical record", e)),
    }
}

#[utoipa::path(
    delete,
    path = "/medical-records",
    params(DeleteRecordQuery),
    responses(
        (status = 200, description = "Record deleted", body = DeleteRecordRes),
        (status = 400, description = "Missing record id", body = ErrorRes),
        (status = 404, description = "No record with this id", body = ErrorRes),
        (status = 500, description = "Persistence failure", body = ErrorRes)
    )
)]
/// Delete a medical record
///
/// `id` selects the record; the optional `patientEmail`/`doctorId` query
/// parameters name the identities whose invalidation cache entries should be
/// dropped alongside the delete.
#[axum::debug_handler]
async fn delete_record(
    State(state): State<AppState>,
    Query(query): Query<DeleteRecordQuery>,
) -> Result<Json<DeleteRecordRes>, (StatusCode, Json<ErrorRes>)> {
    let Some(id) = query.id.filter(|id| !id.trim().is_empty()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorRes::new("Medical record ID is required")),
        ));
    };

    match state.record_service.delete_record(
        &id,
        query.patient_email.as_deref(),
        query.doctor_id.as_deref(),
    ) {
        Ok(()) => Ok(Json(DeleteRecordRes {
            success: true,
            message: "Medical record deleted successfully".into(),
        })),
        Err(e) => Err(failure("delete medical record", e)),
    }
}
