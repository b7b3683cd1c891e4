//! Medical record domain types.
//!
//! The wire format uses camelCase field names and snake_case record-type
//! variants; both are fixed by the upstream callers of the store and must not
//! change. Optional attributes are omitted from JSON entirely when absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Category of a clinical artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    Prescription,
    LabReport,
    Scan,
    DischargeSummary,
    Other,
}

impl RecordType {
    /// The wire name of this record type.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Prescription => "prescription",
            RecordType::LabReport => "lab_report",
            RecordType::Scan => "scan",
            RecordType::DischargeSummary => "discharge_summary",
            RecordType::Other => "other",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown record type name.
#[derive(Debug, thiserror::Error)]
#[error("unknown record type: {0}")]
pub struct ParseRecordTypeError(pub String);

impl std::str::FromStr for RecordType {
    type Err = ParseRecordTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prescription" => Ok(RecordType::Prescription),
            "lab_report" => Ok(RecordType::LabReport),
            "scan" => Ok(RecordType::Scan),
            "discharge_summary" => Ok(RecordType::DischargeSummary),
            "other" => Ok(RecordType::Other),
            other => Err(ParseRecordTypeError(other.to_string())),
        }
    }
}

/// Where a fetched record was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    Cache,
    Database,
}

/// One clinical artifact: a prescription, lab report, scan, discharge summary
/// or other document attached to a patient.
///
/// `id` is unique across the collection. `created_at` is stamped once at
/// creation and never changes; `updated_at` is stamped on every mutation.
/// `date` is the clinical date supplied by the caller and is kept verbatim;
/// it may be a full RFC 3339 instant or a bare `YYYY-MM-DD` date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub date: String,
    pub doctor_name: String,
    #[serde(default)]
    pub doctor_speciality: String,
    #[serde(default)]
    pub doctor_id: String,
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    pub patient_phone: String,
    pub patient_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating a record.
///
/// Every field is optional at the wire level; `title`, `type`, `doctorName`
/// and `patientEmail` are validated as present by the record service, which
/// reports all missing ones at once.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordDraft {
    pub id: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub record_type: Option<RecordType>,
    pub date: Option<String>,
    pub doctor_name: Option<String>,
    pub doctor_speciality: Option<String>,
    pub doctor_id: Option<String>,
    pub patient_name: Option<String>,
    pub patient_phone: Option<String>,
    pub patient_email: Option<String>,
    pub hospital_name: Option<String>,
    pub file_url: Option<String>,
    pub file_size: Option<String>,
    pub notes: Option<String>,
    pub download_url: Option<String>,
    pub appointment_id: Option<String>,
}

/// Partial update of a record.
///
/// This is an explicit allow-list of the mutable fields: `id` and `createdAt`
/// are deliberately absent so a patch can never overwrite a record's identity
/// or its creation stamp. Supplied fields replace the stored value; omitted
/// fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub record_type: Option<RecordType>,
    pub date: Option<String>,
    pub doctor_name: Option<String>,
    pub doctor_speciality: Option<String>,
    pub doctor_id: Option<String>,
    pub patient_name: Option<String>,
    pub patient_phone: Option<String>,
    pub patient_email: Option<String>,
    pub hospital_name: Option<String>,
    pub file_url: Option<String>,
    pub file_size: Option<String>,
    pub notes: Option<String>,
    pub download_url: Option<String>,
    pub appointment_id: Option<String>,
}

impl RecordPatch {
    /// True when the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.record_type.is_none()
            && self.date.is_none()
            && self.doctor_name.is_none()
            && self.doctor_speciality.is_none()
            && self.doctor_id.is_none()
            && self.patient_name.is_none()
            && self.patient_phone.is_none()
            && self.patient_email.is_none()
            && self.hospital_name.is_none()
            && self.file_url.is_none()
            && self.file_size.is_none()
            && self.notes.is_none()
            && self.download_url.is_none()
            && self.appointment_id.is_none()
    }

    /// Applies the supplied fields onto `record`, leaving the rest untouched.
    pub fn apply(&self, record: &mut MedicalRecord) {
        if let Some(title) = &self.title {
            record.title = title.clone();
        }
        if let Some(record_type) = self.record_type {
            record.record_type = record_type;
        }
        if let Some(date) = &self.date {
            record.date = date.clone();
        }
        if let Some(doctor_name) = &self.doctor_name {
            record.doctor_name = doctor_name.clone();
        }
        if let Some(doctor_speciality) = &self.doctor_speciality {
            record.doctor_speciality = doctor_speciality.clone();
        }
        if let Some(doctor_id) = &self.doctor_id {
            record.doctor_id = doctor_id.clone();
        }
        if let Some(patient_name) = &self.patient_name {
            record.patient_name = patient_name.clone();
        }
        if let Some(patient_phone) = &self.patient_phone {
            record.patient_phone = patient_phone.clone();
        }
        if let Some(patient_email) = &self.patient_email {
            record.patient_email = patient_email.clone();
        }
        if let Some(hospital_name) = &self.hospital_name {
            record.hospital_name = Some(hospital_name.clone());
        }
        if let Some(file_url) = &self.file_url {
            record.file_url = Some(file_url.clone());
        }
        if let Some(file_size) = &self.file_size {
            record.file_size = Some(file_size.clone());
        }
        if let Some(notes) = &self.notes {
            record.notes = Some(notes.clone());
        }
        if let Some(download_url) = &self.download_url {
            record.download_url = Some(download_url.clone());
        }
        if let Some(appointment_id) = &self.appointment_id {
            record.appointment_id = Some(appointment_id.clone());
        }
    }
}
