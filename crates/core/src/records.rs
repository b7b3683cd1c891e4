//! Medical record storage operations.
//!
//! This module provides the record store proper: a durable collection of
//! [`MedicalRecord`]s persisted as one blob, fronted by a best-effort
//! read-through cache for single-record lookups. It handles:
//!
//! - Filtered, date-ordered listing of the collection
//! - Cached lookup by id with a time-boxed validity window
//! - Validated creation, allow-list partial update and deletion
//! - Deletion of identity-keyed invalidation cache entries on every write
//!
//! ## Consistency model
//!
//! The durable collection and the cache are two independently-mutable
//! resources with no transactional link. Writes delete the
//! `invalidation:<identity>` entries but deliberately leave `record:<id>`
//! entries in place, so a lookup may serve a stale record for up to the
//! configured TTL after a mutation. Mutations are serialized through a
//! single in-process write guard, so two concurrent writers cannot lose each
//! other's changes.
//!
//! ## Failure model
//!
//! Reads favour availability: an unreadable collection degrades to an empty
//! result (logged). Writes favour correctness: a mutation that cannot read
//! or rewrite the collection fails, and never persists a collection it could
//! not load. Cache failures are logged and swallowed everywhere.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use api_shared::record::{MedicalRecord, RecordDraft, RecordPatch, RecordSource, RecordType};
use medrec_store::{BlobStore, Cache};

use crate::config::CoreConfig;
use crate::constants::{
    INVALIDATION_CACHE_PREFIX, RECORDS_COLLECTION_KEY, RECORD_CACHE_PREFIX, RECORD_ID_PREFIX,
};
use crate::error::{RecordError, RecordResult};
use crate::filter::RecordFilter;

/// A record plus where it was served from.
#[derive(Debug, Clone)]
pub struct FetchedRecord {
    pub record: MedicalRecord,
    pub source: RecordSource,
}

/// Service owning the durable record collection and its cache.
///
/// All record operations pass through this service. It is cheap to share
/// behind an `Arc` and safe to call from concurrent request handlers: reads
/// take no lock, and every read-modify-write mutation runs under the
/// internal write guard.
pub struct RecordService {
    cfg: Arc<CoreConfig>,
    store: Arc<dyn BlobStore>,
    cache: Arc<dyn Cache>,
    write_guard: Mutex<()>,
}

impl RecordService {
    /// Creates a new record service over the given persistence and cache
    /// backends.
    pub fn new(cfg: Arc<CoreConfig>, store: Arc<dyn BlobStore>, cache: Arc<dyn Cache>) -> Self {
        Self {
            cfg,
            store,
            cache,
            write_guard: Mutex::new(()),
        }
    }

    /// Lists records matching `filter`, most recent `date` first.
    ///
    /// A persistence read failure degrades to an empty list rather than an
    /// error; the failure is logged. Ties on `date` keep their collection
    /// order, and records whose `date` cannot be parsed sort last.
    pub fn list_records(&self, filter: &RecordFilter) -> Vec<MedicalRecord> {
        let mut records = match self.load_collection() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("failed to load record collection, returning empty list: {e}");
                return Vec::new();
            }
        };

        records.retain(|record| filter.matches(record));
        sort_by_date_desc(&mut records);
        records
    }

    /// Fetches a single record by id, consulting the cache first.
    ///
    /// A cache hit is returned as-is, tagged [`RecordSource::Cache`], without
    /// touching persistence, so it may trail a recent mutation by up
    /// to the configured TTL. On a miss the collection is searched and the
    /// record, when found, is cached best-effort and tagged
    /// [`RecordSource::Database`].
    ///
    /// # Errors
    ///
    /// Returns `RecordError::NotFound` if no record with `id` exists (or the
    /// collection is unreadable, which degrades to an empty collection).
    pub fn get_record(&self, id: &str) -> RecordResult<FetchedRecord> {
        let cache_key = format!("{RECORD_CACHE_PREFIX}{id}");

        match self.cache.get(&cache_key) {
            Ok(Some(raw)) => match serde_json::from_str::<MedicalRecord>(&raw) {
                Ok(record) => {
                    tracing::debug!("cache hit for record {id}");
                    return Ok(FetchedRecord {
                        record,
                        source: RecordSource::Cache,
                    });
                }
                Err(e) => {
                    tracing::warn!("discarding unparseable cache entry {cache_key}: {e}");
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("cache read failed for {cache_key}: {e}");
            }
        }

        let records = match self.load_collection() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("failed to load record collection for lookup: {e}");
                Vec::new()
            }
        };

        let record = records
            .into_iter()
            .find(|record| record.id == id)
            .ok_or_else(|| RecordError::NotFound(id.to_string()))?;

        match serde_json::to_string(&record) {
            Ok(raw) => {
                if let Err(e) =
                    self.cache
                        .set_with_expiry(&cache_key, &raw, self.cfg.record_cache_ttl())
                {
                    tracing::warn!("failed to cache record {id}: {e}");
                }
            }
            Err(e) => {
                tracing::warn!("failed to serialize record {id} for caching: {e}");
            }
        }

        Ok(FetchedRecord {
            record,
            source: RecordSource::Database,
        })
    }

    /// Creates a record from `draft` and appends it to the collection.
    ///
    /// `title`, `type`, `doctorName` and `patientEmail` must be present; all
    /// missing ones are reported together. A caller-supplied id is honoured
    /// unless it already exists; otherwise a fresh `rec_<uuid>` id is
    /// generated. `date` defaults to the creation instant and `createdAt` is
    /// always stamped here.
    ///
    /// On success the `invalidation:` entries for the record's patient email
    /// and (when non-empty) doctor id are deleted.
    ///
    /// # Errors
    ///
    /// Returns `MissingFields` when required fields are absent, `DuplicateId`
    /// for a caller-supplied id that already exists, and a persistence error
    /// when the collection cannot be read or rewritten.
    pub fn create_record(&self, draft: RecordDraft) -> RecordResult<MedicalRecord> {
        let mut missing = Vec::new();
        let title = require_text(draft.title, "title", &mut missing);
        let record_type = match draft.record_type {
            Some(record_type) => record_type,
            None => {
                missing.push("type");
                RecordType::Other
            }
        };
        let doctor_name = require_text(draft.doctor_name, "doctorName", &mut missing);
        let patient_email = require_text(draft.patient_email, "patientEmail", &mut missing);
        if !missing.is_empty() {
            return Err(RecordError::MissingFields(missing));
        }

        let _guard = self.write_guard.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = self.load_collection()?;

        let id = match draft.id.filter(|id| !id.trim().is_empty()) {
            Some(id) => {
                if records.iter().any(|record| record.id == id) {
                    return Err(RecordError::DuplicateId(id));
                }
                id
            }
            None => new_record_id(),
        };

        let now = Utc::now();
        let record = MedicalRecord {
            id,
            title,
            record_type,
            date: draft
                .date
                .filter(|date| !date.trim().is_empty())
                .unwrap_or_else(|| now.to_rfc3339()),
            doctor_name,
            doctor_speciality: draft.doctor_speciality.unwrap_or_default(),
            doctor_id: draft.doctor_id.unwrap_or_default(),
            patient_name: draft.patient_name.unwrap_or_default(),
            patient_phone: draft.patient_phone.unwrap_or_default(),
            patient_email,
            hospital_name: draft.hospital_name,
            file_url: draft.file_url,
            file_size: draft.file_size,
            notes: draft.notes,
            download_url: draft.download_url,
            appointment_id: draft.appointment_id,
            created_at: now,
            updated_at: None,
        };

        records.push(record.clone());
        self.persist_collection(&records)?;

        self.invalidate_identity(&record.patient_email);
        self.invalidate_identity(&record.doctor_id);

        tracing::info!("created record {} ({} total)", record.id, records.len());
        Ok(record)
    }

    /// Applies `patch` to the record with `id` and stamps `updatedAt`.
    ///
    /// The patch is an allow-list: `id` and `createdAt` cannot be changed.
    /// Invalidation entries are deleted for the identities supplied *in the
    /// patch*: a caller moving a record between patients or doctors must
    /// supply the identities it wants invalidated.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record with `id` exists, or a persistence
    /// error when the collection cannot be read or rewritten.
    pub fn update_record(&self, id: &str, patch: RecordPatch) -> RecordResult<MedicalRecord> {
        let _guard = self.write_guard.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = self.load_collection()?;

        let Some(record) = records.iter_mut().find(|record| record.id == id) else {
            return Err(RecordError::NotFound(id.to_string()));
        };

        patch.apply(record);
        record.updated_at = Some(Utc::now());
        let updated = record.clone();

        self.persist_collection(&records)?;

        if let Some(patient_email) = &patch.patient_email {
            self.invalidate_identity(patient_email);
        }
        if let Some(doctor_id) = &patch.doctor_id {
            self.invalidate_identity(doctor_id);
        }

        Ok(updated)
    }

    /// Removes the record with `id` from the collection.
    ///
    /// `patient_email` and `doctor_id` are the caller-supplied identities
    /// whose invalidation entries should be deleted; they are not derived
    /// from the removed record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record with `id` exists, or a persistence
    /// error when the collection cannot be read or rewritten.
    pub fn delete_record(
        &self,
        id: &str,
        patient_email: Option<&str>,
        doctor_id: Option<&str>,
    ) -> RecordResult<()> {
        let _guard = self.write_guard.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = self.load_collection()?;

        let initial_len = records.len();
        records.retain(|record| record.id != id);
        if records.len() == initial_len {
            return Err(RecordError::NotFound(id.to_string()));
        }

        self.persist_collection(&records)?;

        if let Some(patient_email) = patient_email {
            self.invalidate_identity(patient_email);
        }
        if let Some(doctor_id) = doctor_id {
            self.invalidate_identity(doctor_id);
        }

        tracing::info!("deleted record {id} ({} remaining)", records.len());
        Ok(())
    }

    fn load_collection(&self) -> RecordResult<Vec<MedicalRecord>> {
        match self.store.get(RECORDS_COLLECTION_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(RecordError::Deserialization),
            None => Ok(Vec::new()),
        }
    }

    fn persist_collection(&self, records: &[MedicalRecord]) -> RecordResult<()> {
        let raw = serde_json::to_string(records).map_err(RecordError::Serialization)?;
        self.store.set(RECORDS_COLLECTION_KEY, &raw)?;
        Ok(())
    }

    /// Best-effort deletion of one identity's invalidation entry.
    fn invalidate_identity(&self, identity: &str) {
        if identity.is_empty() {
            return;
        }
        let key = format!("{INVALIDATION_CACHE_PREFIX}{identity}");
        if let Err(e) = self.cache.delete(&key) {
            tracing::warn!("failed to delete invalidation entry {key}: {e}");
        }
    }
}

fn require_text(
    value: Option<String>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            missing.push(name);
            String::new()
        }
    }
}

fn new_record_id() -> String {
    format!("{RECORD_ID_PREFIX}{}", Uuid::new_v4().simple())
}

/// Parses a record `date`: a full RFC 3339 instant or a bare calendar date.
fn parse_record_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
}

/// Stable sort, most recent `date` first; unparseable dates last.
fn sort_by_date_desc(records: &mut [MedicalRecord]) {
    records.sort_by_cached_key(|record| std::cmp::Reverse(parse_record_date(&record.date)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};
    use std::time::Duration;

    use medrec_store::{CacheError, FileStore, MemoryCache, MemoryStore, StoreError};
    use tempfile::TempDir;

    /// Blob store whose reads succeed but whose writes always fail.
    struct ReadOnlyStore(MemoryStore);

    impl BlobStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.get(key)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Write(IoError::new(
                ErrorKind::Other,
                "store is read-only",
            )))
        }
    }

    /// Blob store that fails every operation.
    struct DownStore;

    impl BlobStore for DownStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Read(IoError::new(
                ErrorKind::Other,
                "store is down",
            )))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Write(IoError::new(
                ErrorKind::Other,
                "store is down",
            )))
        }
    }

    /// Cache that fails every operation.
    struct DownCache;

    impl Cache for DownCache {
        fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Unavailable("cache is down".into()))
        }
        fn set_with_expiry(
            &self,
            _key: &str,
            _value: &str,
            _ttl: Duration,
        ) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("cache is down".into()))
        }
        fn delete(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("cache is down".into()))
        }
    }

    fn test_cfg() -> Arc<CoreConfig> {
        Arc::new(CoreConfig::default())
    }

    fn test_service() -> (RecordService, Arc<MemoryStore>, Arc<MemoryCache>) {
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(MemoryCache::new());
        let service = RecordService::new(test_cfg(), store.clone(), cache.clone());
        (service, store, cache)
    }

    fn cbc_draft() -> RecordDraft {
        RecordDraft {
            title: Some("CBC Test".to_string()),
            record_type: Some(RecordType::LabReport),
            doctor_name: Some("Dr. X".to_string()),
            patient_email: Some("a@b.com".to_string()),
            date: Some("2024-01-01".to_string()),
            ..RecordDraft::default()
        }
    }

    #[test]
    fn create_assigns_id_and_creation_stamp() {
        let (service, _store, _cache) = test_service();

        let record = service.create_record(cbc_draft()).expect("create should succeed");

        assert!(record.id.starts_with(RECORD_ID_PREFIX));
        assert_eq!(record.title, "CBC Test");
        assert_eq!(record.date, "2024-01-01");
        assert!(record.updated_at.is_none());

        let listed = service.list_records(&RecordFilter {
            patient_email: Some("a@b.com".to_string()),
            ..RecordFilter::default()
        });
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], record);
    }

    #[test]
    fn create_generates_unique_ids() {
        let (service, _store, _cache) = test_service();

        let first = service.create_record(cbc_draft()).unwrap();
        let second = service.create_record(cbc_draft()).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(service.list_records(&RecordFilter::default()).len(), 2);
    }

    #[test]
    fn create_reports_all_missing_fields_at_once() {
        let (service, _store, _cache) = test_service();

        let err = service
            .create_record(RecordDraft::default())
            .expect_err("empty draft should fail");

        let RecordError::MissingFields(missing) = err else {
            panic!("expected MissingFields, got {err:?}");
        };
        assert_eq!(missing, vec!["title", "type", "doctorName", "patientEmail"]);
    }

    #[test]
    fn create_honours_caller_id_and_rejects_duplicates() {
        let (service, _store, _cache) = test_service();

        let draft = RecordDraft {
            id: Some("rec_custom".to_string()),
            ..cbc_draft()
        };
        let record = service.create_record(draft.clone()).unwrap();
        assert_eq!(record.id, "rec_custom");

        let err = service
            .create_record(draft)
            .expect_err("duplicate id should fail");
        assert!(matches!(err, RecordError::DuplicateId(id) if id == "rec_custom"));
    }

    #[test]
    fn create_defaults_date_to_creation_instant() {
        let (service, _store, _cache) = test_service();

        let record = service
            .create_record(RecordDraft {
                date: None,
                ..cbc_draft()
            })
            .unwrap();

        let parsed = parse_record_date(&record.date).expect("generated date should parse");
        assert_eq!(parsed, record.created_at);
    }

    #[test]
    fn create_deletes_invalidation_entries() {
        let (service, _store, cache) = test_service();
        cache
            .set_with_expiry("invalidation:a@b.com", "1", Duration::from_secs(600))
            .unwrap();
        cache
            .set_with_expiry("invalidation:doc_1", "1", Duration::from_secs(600))
            .unwrap();

        service
            .create_record(RecordDraft {
                doctor_id: Some("doc_1".to_string()),
                ..cbc_draft()
            })
            .unwrap();

        assert!(cache.get("invalidation:a@b.com").unwrap().is_none());
        assert!(cache.get("invalidation:doc_1").unwrap().is_none());
    }

    #[test]
    fn create_propagates_persistence_write_failure() {
        let cfg = test_cfg();
        let service = RecordService::new(
            cfg,
            Arc::new(ReadOnlyStore(MemoryStore::new())),
            Arc::new(MemoryCache::new()),
        );

        let err = service
            .create_record(cbc_draft())
            .expect_err("write failure should propagate");
        assert!(matches!(err, RecordError::Store(_)));
    }

    #[test]
    fn get_roundtrips_after_create_and_then_hits_the_cache() {
        let (service, _store, _cache) = test_service();
        let created = service.create_record(cbc_draft()).unwrap();

        let first = service.get_record(&created.id).expect("record should exist");
        assert_eq!(first.source, RecordSource::Database);
        assert_eq!(first.record, created);

        let second = service.get_record(&created.id).expect("record should exist");
        assert_eq!(second.source, RecordSource::Cache);
        assert_eq!(second.record, created);
    }

    #[test]
    fn get_missing_record_returns_not_found() {
        let (service, _store, _cache) = test_service();

        let err = service.get_record("rec_missing").expect_err("should be absent");
        assert!(matches!(err, RecordError::NotFound(id) if id == "rec_missing"));
    }

    #[test]
    fn get_survives_a_down_cache() {
        let cfg = test_cfg();
        let service = RecordService::new(cfg, Arc::new(MemoryStore::new()), Arc::new(DownCache));
        let created = service.create_record(cbc_draft()).unwrap();

        let fetched = service.get_record(&created.id).expect("read must not fail");
        assert_eq!(fetched.source, RecordSource::Database);
    }

    #[test]
    fn stale_cache_entry_survives_update_within_ttl() {
        let (service, _store, _cache) = test_service();
        let created = service.create_record(cbc_draft()).unwrap();

        // Prime the per-id cache, then mutate the record.
        assert_eq!(
            service.get_record(&created.id).unwrap().source,
            RecordSource::Database
        );
        service
            .update_record(
                &created.id,
                RecordPatch {
                    notes: Some("updated".to_string()),
                    ..RecordPatch::default()
                },
            )
            .unwrap();

        // Writes do not invalidate record:<id>, so the lookup still serves
        // the pre-update value until the entry expires.
        let fetched = service.get_record(&created.id).unwrap();
        assert_eq!(fetched.source, RecordSource::Cache);
        assert!(fetched.record.notes.is_none());
    }

    #[test]
    fn update_changes_only_patched_fields_and_stamps_updated_at() {
        let (service, _store, _cache) = test_service();
        let created = service.create_record(cbc_draft()).unwrap();

        let updated = service
            .update_record(
                &created.id,
                RecordPatch {
                    notes: Some("fasting sample".to_string()),
                    ..RecordPatch::default()
                },
            )
            .expect("update should succeed");

        assert_eq!(updated.notes.as_deref(), Some("fasting sample"));
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.patient_email, created.patient_email);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at.expect("updatedAt should be stamped") > created.created_at);
    }

    #[test]
    fn repeated_updates_advance_updated_at() {
        let (service, _store, _cache) = test_service();
        let created = service.create_record(cbc_draft()).unwrap();

        let first = service
            .update_record(&created.id, RecordPatch::default())
            .unwrap()
            .updated_at
            .unwrap();
        let second = service
            .update_record(&created.id, RecordPatch::default())
            .unwrap()
            .updated_at
            .unwrap();

        assert!(second > first);
    }

    #[test]
    fn update_missing_record_returns_not_found() {
        let (service, _store, _cache) = test_service();

        let err = service
            .update_record("rec_missing", RecordPatch::default())
            .expect_err("should be absent");
        assert!(matches!(err, RecordError::NotFound(_)));
    }

    #[test]
    fn update_invalidates_identities_supplied_in_the_patch() {
        let (service, _store, cache) = test_service();
        let created = service.create_record(cbc_draft()).unwrap();

        cache
            .set_with_expiry("invalidation:new@b.com", "1", Duration::from_secs(600))
            .unwrap();
        cache
            .set_with_expiry("invalidation:a@b.com", "1", Duration::from_secs(600))
            .unwrap();

        service
            .update_record(
                &created.id,
                RecordPatch {
                    patient_email: Some("new@b.com".to_string()),
                    ..RecordPatch::default()
                },
            )
            .unwrap();

        // Only the identity named in the patch is invalidated; the original
        // patient's entry is left alone.
        assert!(cache.get("invalidation:new@b.com").unwrap().is_none());
        assert!(cache.get("invalidation:a@b.com").unwrap().is_some());
    }

    #[test]
    fn delete_then_get_returns_not_found() {
        let (service, _store, _cache) = test_service();
        let created = service.create_record(cbc_draft()).unwrap();

        service
            .delete_record(&created.id, Some("a@b.com"), None)
            .expect("delete should succeed");

        let err = service.get_record(&created.id).expect_err("should be gone");
        assert!(matches!(err, RecordError::NotFound(_)));
        assert!(service.list_records(&RecordFilter::default()).is_empty());
    }

    #[test]
    fn delete_missing_record_returns_not_found() {
        let (service, _store, _cache) = test_service();

        let err = service
            .delete_record("rec_missing", None, None)
            .expect_err("should be absent");
        assert!(matches!(err, RecordError::NotFound(_)));
    }

    #[test]
    fn delete_invalidates_caller_supplied_identities() {
        let (service, _store, cache) = test_service();
        let created = service.create_record(cbc_draft()).unwrap();

        cache
            .set_with_expiry("invalidation:a@b.com", "1", Duration::from_secs(600))
            .unwrap();
        cache
            .set_with_expiry("invalidation:doc_1", "1", Duration::from_secs(600))
            .unwrap();

        service
            .delete_record(&created.id, Some("a@b.com"), Some("doc_1"))
            .unwrap();

        assert!(cache.get("invalidation:a@b.com").unwrap().is_none());
        assert!(cache.get("invalidation:doc_1").unwrap().is_none());
    }

    #[test]
    fn list_filters_by_type() {
        let (service, _store, _cache) = test_service();
        service.create_record(cbc_draft()).unwrap();
        service
            .create_record(RecordDraft {
                title: Some("Amoxicillin".to_string()),
                record_type: Some(RecordType::Prescription),
                ..cbc_draft()
            })
            .unwrap();

        let prescriptions = service.list_records(&RecordFilter {
            record_type: Some("prescription".to_string()),
            ..RecordFilter::default()
        });

        assert_eq!(prescriptions.len(), 1);
        assert_eq!(prescriptions[0].record_type, RecordType::Prescription);

        let all = service.list_records(&RecordFilter {
            record_type: Some("all".to_string()),
            ..RecordFilter::default()
        });
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn list_sorts_by_date_descending() {
        let (service, _store, _cache) = test_service();
        service
            .create_record(RecordDraft {
                title: Some("January".to_string()),
                date: Some("2024-01-01".to_string()),
                ..cbc_draft()
            })
            .unwrap();
        service
            .create_record(RecordDraft {
                title: Some("June".to_string()),
                date: Some("2024-06-01".to_string()),
                ..cbc_draft()
            })
            .unwrap();

        let listed = service.list_records(&RecordFilter {
            patient_email: Some("a@b.com".to_string()),
            ..RecordFilter::default()
        });

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "June");
        assert_eq!(listed[1].title, "January");
    }

    #[test]
    fn list_keeps_collection_order_for_date_ties_and_sorts_bad_dates_last() {
        let (service, _store, _cache) = test_service();
        for title in ["first", "second"] {
            service
                .create_record(RecordDraft {
                    title: Some(title.to_string()),
                    date: Some("2024-03-15".to_string()),
                    ..cbc_draft()
                })
                .unwrap();
        }
        service
            .create_record(RecordDraft {
                title: Some("undated".to_string()),
                date: Some("sometime last week".to_string()),
                ..cbc_draft()
            })
            .unwrap();

        let listed = service.list_records(&RecordFilter::default());

        assert_eq!(listed[0].title, "first");
        assert_eq!(listed[1].title, "second");
        assert_eq!(listed[2].title, "undated");
    }

    #[test]
    fn list_degrades_to_empty_when_the_store_is_down() {
        let cfg = test_cfg();
        let service = RecordService::new(cfg, Arc::new(DownStore), Arc::new(MemoryCache::new()));

        assert!(service.list_records(&RecordFilter::default()).is_empty());
    }

    #[test]
    fn list_degrades_to_empty_on_a_corrupt_collection_blob() {
        let (service, store, _cache) = test_service();
        store.set(RECORDS_COLLECTION_KEY, "not json").unwrap();

        assert!(service.list_records(&RecordFilter::default()).is_empty());
    }

    #[test]
    fn mutations_fail_rather_than_clobber_an_unreadable_collection() {
        let (service, store, _cache) = test_service();
        service.create_record(cbc_draft()).unwrap();
        store.set(RECORDS_COLLECTION_KEY, "not json").unwrap();

        let err = service
            .create_record(cbc_draft())
            .expect_err("create over a corrupt blob must not succeed");
        assert!(matches!(err, RecordError::Deserialization(_)));

        // The corrupt blob is still there, untouched.
        assert_eq!(store.get(RECORDS_COLLECTION_KEY).unwrap().as_deref(), Some("not json"));
    }

    #[test]
    fn service_works_over_the_file_store() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = Arc::new(FileStore::open(temp_dir.path()).expect("open should succeed"));
        let service = RecordService::new(test_cfg(), store, Arc::new(MemoryCache::new()));

        let created = service.create_record(cbc_draft()).unwrap();
        let fetched = service.get_record(&created.id).unwrap();

        assert_eq!(fetched.record, created);
        assert!(temp_dir.path().join(RECORDS_COLLECTION_KEY).is_file());
    }
}
