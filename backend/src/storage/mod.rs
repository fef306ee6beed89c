//! # Storage Module
//!
//! Persistence for users and payments behind the [`UserStorage`] and
//! [`PaymentStorage`] traits.
//!
//! ## Implementations
//!
//! - **CSV**: `users.csv` and `payments.csv` in a local data directory
//! - **Supabase**: the hosted PostgREST tables `users` and `payments`
//!
//! The domain layer only sees the traits, so either store can back the
//! services without changes elsewhere.

pub mod csv;
pub mod error;
pub mod supabase;
pub mod traits;

pub use error::StoreError;
pub use supabase::SupabaseStore;
pub use traits::{PaymentStorage, UserStorage};
