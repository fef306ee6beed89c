//! # Storage Traits
//!
//! The store collaborator seen by the domain layer. Implementations own
//! persistence and network I/O; services only ever receive the collections
//! they return.

use async_trait::async_trait;
use shared::{Payment, User};

use super::error::StoreError;

/// Trait defining the interface for user storage operations
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// List all users ordered by name
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    /// Store a new user
    async fn store_user(&self, user: &User) -> Result<(), StoreError>;

    /// Replace an existing user, matched by ID
    async fn update_user(&self, user: &User) -> Result<(), StoreError>;

    /// Delete a user by ID
    async fn delete_user(&self, user_id: &str) -> Result<(), StoreError>;
}

/// Trait defining the interface for payment storage operations
#[async_trait]
pub trait PaymentStorage: Send + Sync {
    /// List all payments, most recent `payment_date` first
    async fn list_payments(&self) -> Result<Vec<Payment>, StoreError>;

    /// Store a new payment
    async fn store_payment(&self, payment: &Payment) -> Result<(), StoreError>;

    /// Remove every payment recorded against a user.
    /// Returns the number of payments removed when the store can tell.
    async fn delete_payments_for_user(&self, user_id: &str) -> Result<u32, StoreError>;
}
