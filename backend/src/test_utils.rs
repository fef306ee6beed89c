//! Shared fixtures for unit tests.
//!
//! `TestEnvironment` owns a temporary data directory that is removed when the
//! environment is dropped, even if the test panics.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;

use shared::{Payment, PaymentMode, User};
use tempfile::TempDir;

use crate::domain::{Clock, FixedClock};
use crate::storage::csv::{CsvConnection, CsvPaymentRepository, CsvUserRepository};
use crate::storage::{PaymentStorage, StoreError, UserStorage};
use crate::AppState;

/// Clock that advances to the next listed date on every reading and then
/// stays on the last one
pub struct SteppingClock {
    dates: Vec<NaiveDate>,
    readings: AtomicUsize,
}

impl SteppingClock {
    pub fn new(dates: &[(i32, u32, u32)]) -> Self {
        Self {
            dates: dates
                .iter()
                .map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
                .collect(),
            readings: AtomicUsize::new(0),
        }
    }

    pub fn readings(&self) -> usize {
        self.readings.load(Ordering::SeqCst)
    }
}

impl Clock for SteppingClock {
    fn today(&self) -> NaiveDate {
        let index = self.readings.fetch_add(1, Ordering::SeqCst);
        self.dates[index.min(self.dates.len() - 1)]
    }
}

/// A user with the given identity and placeholder profile fields
pub fn user(id: &str, name: &str, email: &str, mobile: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        mobile: mobile.to_string(),
        address: "12 Library Road".to_string(),
        seat_no: "A-1".to_string(),
        joining_date: "2024-01-01".to_string(),
    }
}

/// A cash payment without remarks
pub fn payment(id: &str, user_id: &str, payment_date: &str, paid_for_month: &str, amount: f64) -> Payment {
    Payment {
        id: id.to_string(),
        user_id: user_id.to_string(),
        payment_date: payment_date.to_string(),
        payment_mode: PaymentMode::Cash,
        amount,
        paid_for_month: paid_for_month.to_string(),
        remarks: None,
    }
}

pub fn payment_with_mode(id: &str, user_id: &str, mode: PaymentMode) -> Payment {
    Payment {
        payment_mode: mode,
        ..payment(id, user_id, "2024-03-01T10:00:00", "2024-03", 100.0)
    }
}

/// RAII test environment backed by a temporary directory
pub struct TestEnvironment {
    /// Kept alive so the directory survives until drop
    _temp_dir: TempDir,
    pub connection: CsvConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self, StoreError> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = CsvConnection::new(&base_path)?;

        Ok(Self {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_path
    }

    pub fn user_storage(&self) -> Arc<dyn UserStorage> {
        Arc::new(CsvUserRepository::new(self.connection.clone()))
    }

    pub fn payment_storage(&self) -> Arc<dyn PaymentStorage> {
        Arc::new(CsvPaymentRepository::new(self.connection.clone()))
    }
}

/// Application state over the environment's CSV files, with the clock fixed
/// at 2024-03-15
pub fn test_state(env: &TestEnvironment) -> AppState {
    let clock = FixedClock::from_ymd(2024, 3, 15).expect("valid date");
    AppState::new(env.user_storage(), env.payment_storage(), Arc::new(clock))
}
