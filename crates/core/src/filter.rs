//! Record listing filters.
//!
//! A [`RecordFilter`] is a conjunction of optional exact-match predicates.
//! Each supplied field must match a record exactly for the record to be kept;
//! unsupplied fields match everything. The predicates are pure field
//! comparisons, so the result is independent of evaluation order.

use api_shared::record::MedicalRecord;
use api_shared::wire::ListRecordsQuery;

/// Exact-match filters applied to the record collection.
///
/// `record_type` is matched against the record's wire type name; the special
/// value `"all"` is treated as no type filter, and an unknown type name
/// simply matches nothing.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub id: Option<String>,
    pub patient_email: Option<String>,
    pub doctor_id: Option<String>,
    pub record_type: Option<String>,
    pub appointment_id: Option<String>,
}

impl RecordFilter {
    /// True when `record` satisfies every supplied predicate.
    pub fn matches(&self, record: &MedicalRecord) -> bool {
        if let Some(id) = &self.id {
            if record.id != *id {
                return false;
            }
        }
        if let Some(patient_email) = &self.patient_email {
            if record.patient_email != *patient_email {
                return false;
            }
        }
        if let Some(doctor_id) = &self.doctor_id {
            if record.doctor_id != *doctor_id {
                return false;
            }
        }
        if let Some(record_type) = &self.record_type {
            if record_type != "all" && record.record_type.as_str() != record_type {
                return false;
            }
        }
        if let Some(appointment_id) = &self.appointment_id {
            if record.appointment_id.as_deref() != Some(appointment_id.as_str()) {
                return false;
            }
        }
        true
    }
}

impl From<ListRecordsQuery> for RecordFilter {
    fn from(query: ListRecordsQuery) -> Self {
        Self {
            id: query.id,
            patient_email: query.patient_email,
            doctor_id: query.doctor_id,
            record_type: query.record_type,
            appointment_id: query.appointment_id,
        }
    }
}
