use clap::{Parser, Subcommand};
use std::sync::Arc;

use api_shared::record::{RecordDraft, RecordPatch, RecordType};
use medrec_core::{
    config::cache_ttl_from_env_value, constants::DEFAULT_DATA_DIR, CoreConfig, RecordFilter,
    RecordService,
};
use medrec_store::{FileStore, MemoryCache};

#[derive(Parser)]
#[command(name = "medrec")]
#[command(about = "medrec medical record store CLI")]
struct Cli {
    /// Record data directory (defaults to MEDREC_DATA_DIR or "record_data")
    #[arg(long)]
    data_dir: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List records, most recent first
    List {
        /// Only records for this patient email
        #[arg(long)]
        patient_email: Option<String>,
        /// Only records for this doctor id
        #[arg(long)]
        doctor_id: Option<String>,
        /// Only records of this type ("all" lists every type)
        #[arg(long = "type")]
        record_type: Option<String>,
        /// Only records linked to this appointment
        #[arg(long)]
        appointment_id: Option<String>,
    },
    /// Fetch one record by id
    Get {
        /// Record id
        id: String,
    },
    /// Create a record
    Create {
        /// Record title
        title: String,
        /// Record type (prescription, lab_report, scan, discharge_summary, other)
        record_type: String,
        /// Treating doctor's name
        doctor_name: String,
        /// Patient email
        patient_email: String,
        /// Clinical date (RFC 3339 or YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
        /// Doctor id (optional)
        #[arg(long)]
        doctor_id: Option<String>,
        /// Free-text notes (optional)
        #[arg(long)]
        notes: Option<String>,
        /// Hospital name (optional)
        #[arg(long)]
        hospital_name: Option<String>,
        /// Linked appointment id (optional)
        #[arg(long)]
        appointment_id: Option<String>,
    },
    /// Update fields of an existing record
    Update {
        /// Record id
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New clinical date
        #[arg(long)]
        date: Option<String>,
        /// New notes
        #[arg(long)]
        notes: Option<String>,
        /// New doctor name
        #[arg(long)]
        doctor_name: Option<String>,
        /// New hospital name
        #[arg(long)]
        hospital_name: Option<String>,
    },
    /// Delete a record
    Delete {
        /// Record id
        id: String,
        /// Patient email whose cache entry should be invalidated
        #[arg(long)]
        patient_email: Option<String>,
        /// Doctor id whose cache entry should be invalidated
        #[arg(long)]
        doctor_id: Option<String>,
    },
}

fn open_service(data_dir: Option<String>) -> Result<RecordService, Box<dyn std::error::Error>> {
    let data_dir = data_dir
        .or_else(|| std::env::var("MEDREC_DATA_DIR").ok())
        .unwrap_or_else(|| DEFAULT_DATA_DIR.into());
    let cache_ttl = cache_ttl_from_env_value(std::env::var("MEDREC_CACHE_TTL_SECS").ok())?;

    let cfg = Arc::new(CoreConfig::new(cache_ttl));
    let store = Arc::new(FileStore::open(data_dir)?);
    let cache = Arc::new(MemoryCache::new());

    Ok(RecordService::new(cfg, store, cache))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List {
            patient_email,
            doctor_id,
            record_type,
            appointment_id,
        }) => {
            let service = open_service(cli.data_dir)?;
            let filter = RecordFilter {
                id: None,
                patient_email,
                doctor_id,
                record_type,
                appointment_id,
            };
            let records = service.list_records(&filter);
            if records.is_empty() {
                println!("No records found.");
            } else {
                for record in records {
                    println!(
                        "ID: {}, Title: {}, Type: {}, Date: {}, Patient: {}",
                        record.id,
                        record.title,
                        record.record_type,
                        record.date,
                        record.patient_email
                    );
                }
            }
        }
        Some(Commands::Get { id }) => {
            let service = open_service(cli.data_dir)?;
            match service.get_record(&id) {
                Ok(fetched) => {
                    let record = fetched.record;
                    println!(
                        "ID: {}, Title: {}, Type: {}, Date: {}, Doctor: {}, Patient: {}",
                        record.id,
                        record.title,
                        record.record_type,
                        record.date,
                        record.doctor_name,
                        record.patient_email
                    );
                    if let Some(notes) = record.notes {
                        println!("Notes: {notes}");
                    }
                }
                Err(e) => eprintln!("Error fetching record: {e}"),
            }
        }
        Some(Commands::Create {
            title,
            record_type,
            doctor_name,
            patient_email,
            date,
            doctor_id,
            notes,
            hospital_name,
            appointment_id,
        }) => {
            let record_type: RecordType = record_type.parse()?;
            let service = open_service(cli.data_dir)?;
            let draft = RecordDraft {
                title: Some(title),
                record_type: Some(record_type),
                doctor_name: Some(doctor_name),
                patient_email: Some(patient_email),
                date,
                doctor_id,
                notes,
                hospital_name,
                appointment_id,
                ..RecordDraft::default()
            };
            match service.create_record(draft) {
                Ok(record) => println!("Created record with ID: {}", record.id),
                Err(e) => eprintln!("Error creating record: {e}"),
            }
        }
        Some(Commands::Update {
            id,
            title,
            date,
            notes,
            doctor_name,
            hospital_name,
        }) => {
            let patch = RecordPatch {
                title,
                date,
                notes,
                doctor_name,
                hospital_name,
                ..RecordPatch::default()
            };
            if patch.is_empty() {
                println!("Nothing to update.");
                return Ok(());
            }
            let service = open_service(cli.data_dir)?;
            match service.update_record(&id, patch) {
                Ok(record) => println!("Updated record {}", record.id),
                Err(e) => eprintln!("Error updating record: {e}"),
            }
        }
        Some(Commands::Delete {
            id,
            patient_email,
            doctor_id,
        }) => {
            let service = open_service(cli.data_dir)?;
            match service.delete_record(&id, patient_email.as_deref(), doctor_id.as_deref()) {
                Ok(()) => println!("Deleted record {id}"),
                Err(e) => eprintln!("Error deleting record: {e}"),
            }
        }
        None => {
            println!("No command provided. Try `medrec --help`.");
        }
    }

    Ok(())
}
