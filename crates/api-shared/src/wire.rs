//! Request and response envelopes for the REST surface.
//!
//! Every response carries a `success` flag so callers can branch without
//! inspecting status codes; failure bodies carry a stable `message`.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::record::{MedicalRecord, RecordPatch, RecordSource};

/// Query parameters accepted by the list operation.
///
/// Each parameter is an exact-match predicate; supplying several combines
/// them with AND. `type=all` is treated as no type filter.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListRecordsQuery {
    pub id: Option<String>,
    pub patient_email: Option<String>,
    pub doctor_id: Option<String>,
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    pub appointment_id: Option<String>,
}

/// Query parameters accepted by the delete operation.
///
/// `patient_email` and `doctor_id` drive cache invalidation only; the record
/// itself is located by `id`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRecordQuery {
    pub id: Option<String>,
    pub patient_email: Option<String>,
    pub doctor_id: Option<String>,
}

/// Body of the update operation: the target `id` plus the fields to change.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecordReq {
    pub id: Option<String>,
    #[serde(flatten)]
    pub patch: RecordPatch,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecordsRes {
    pub success: bool,
    pub records: Vec<MedicalRecord>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GetRecordRes {
    pub success: bool,
    pub record: MedicalRecord,
    pub source: RecordSource,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRecordRes {
    pub success: bool,
    pub message: String,
    pub record: MedicalRecord,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpdateRecordRes {
    pub success: bool,
    pub message: String,
    pub record: MedicalRecord,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeleteRecordRes {
    pub success: bool,
    pub message: String,
}

/// Failure body shared by every operation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorRes {
    pub success: bool,
    pub message: String,
}

impl ErrorRes {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}
