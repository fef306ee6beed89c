use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::storage::error::StoreError;

pub const USERS_FILE: &str = "users.csv";
pub const PAYMENTS_FILE: &str = "payments.csv";

pub const USER_HEADERS: [&str; 7] = ["id", "name", "email", "mobile", "address", "seat_no", "joining_date"];
pub const PAYMENT_HEADERS: [&str; 7] = [
    "id",
    "user_id",
    "payment_date",
    "payment_mode",
    "amount",
    "paid_for_month",
    "remarks",
];

/// CsvConnection manages the data directory holding `users.csv` and
/// `payments.csv`.
///
/// Clones share one write lock, so read-modify-write cycles from different
/// repositories never interleave.
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self, StoreError> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Get the base directory path
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn users_file_path(&self) -> PathBuf {
        self.base_directory.join(USERS_FILE)
    }

    pub fn payments_file_path(&self) -> PathBuf {
        self.base_directory.join(PAYMENTS_FILE)
    }

    /// Hold this while reading and rewriting a file
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Read every well-formed row of a CSV file. A missing file reads as
    /// empty; rows that fail to parse are skipped with a warning.
    pub fn read_records<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>, StoreError> {
        if !path.exists() {
            debug!("{} does not exist yet, treating as empty", path.display());
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(path)?;
        let mut records = Vec::new();

        for (index, result) in reader.deserialize::<T>().enumerate() {
            match result {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping malformed row {} in {}: {}", index + 1, path.display(), e),
            }
        }

        Ok(records)
    }

    /// Rewrite a CSV file with the given header and rows.
    ///
    /// Writes go to a temp file that is renamed over the existing file.
    pub fn write_records<T: Serialize>(&self, path: &Path, headers: &[&str], records: &[T]) -> Result<(), StoreError> {
        let temp_path = path.with_extension("tmp");

        {
            let file = File::create(&temp_path)?;
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(BufWriter::new(file));

            writer.write_record(headers)?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }

        fs::rename(&temp_path, path)?;
        debug!("Wrote {} rows to {}", records.len(), path.display());
        Ok(())
    }
}
