//! Flat-file store: `users.csv` and `payments.csv` in one data directory.

pub mod connection;
pub mod payment_repository;
pub mod user_repository;

pub use connection::CsvConnection;
pub use payment_repository::CsvPaymentRepository;
pub use user_repository::CsvUserRepository;
