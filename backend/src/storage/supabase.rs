//! Hosted store backed by a Supabase project's PostgREST endpoint.
//!
//! Tables `users` and `payments` use the same snake_case columns as the
//! shared types. Deleting a user relies on the database's `ON DELETE CASCADE`
//! for that user's payments.

use async_trait::async_trait;
use postgrest::{Builder, Postgrest};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{Payment, User};
use tracing::{debug, error, info, warn};

use super::error::StoreError;
use super::traits::{PaymentStorage, UserStorage};

const USERS_TABLE: &str = "users";
const PAYMENTS_TABLE: &str = "payments";

pub struct SupabaseStore {
    client: Postgrest,
}

impl SupabaseStore {
    /// Build a client for `<url>/rest/v1` authenticated with `key`
    pub fn new(url: &str, key: &str) -> Result<Self, StoreError> {
        if url.trim().is_empty() {
            return Err(StoreError::Connection("Supabase URL is empty".to_string()));
        }
        if key.trim().is_empty() {
            return Err(StoreError::Connection("Supabase key is empty".to_string()));
        }

        let rest_url = format!("{}/rest/v1", url.trim_end_matches('/'));
        let client = Postgrest::new(&rest_url)
            .insert_header("apikey", key)
            .insert_header("Authorization", format!("Bearer {}", key));

        info!("Using Supabase store at {}", rest_url);
        Ok(Self { client })
    }
}

/// Run a request and return the raw rows. Error statuses become
/// `StoreError::Query` carrying the backend's message.
async fn execute(request: Builder, table: &str) -> Result<Vec<Value>, StoreError> {
    let response = request.execute().await.map_err(|e| {
        error!("Request to {} failed: {}", table, e);
        StoreError::Connection(e.to_string())
    })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| StoreError::Connection(e.to_string()))?;

    if !status.is_success() {
        error!("{} request returned {}: {}", table, status, body);
        return Err(StoreError::Query(
            backend_message(&body).unwrap_or_else(|| status.to_string()),
        ));
    }

    debug!("{} request returned {}", table, status);
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&body)?)
}

/// Decode every well-formed row; rows that do not fit `T` are skipped with a
/// warning
fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>, table: &str) -> Vec<T> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed row {} from {}: {}", index + 1, table, e);
                None
            }
        })
        .collect()
}

/// PostgREST errors carry a `message` field
fn backend_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[async_trait]
impl UserStorage for SupabaseStore {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let request = self.client.from(USERS_TABLE).select("*").order("name.asc");
        let rows = execute(request, USERS_TABLE).await?;
        Ok(decode_rows(rows, USERS_TABLE))
    }

    async fn store_user(&self, user: &User) -> Result<(), StoreError> {
        let request = self.client.from(USERS_TABLE).insert(serde_json::to_string(user)?);
        execute(request, USERS_TABLE).await?;
        info!("Stored user {} ({})", user.name, user.id);
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<(), StoreError> {
        let request = self
            .client
            .from(USERS_TABLE)
            .update(serde_json::to_string(user)?)
            .eq("id", &user.id);

        // the builder asks for the affected rows back, so none means no match
        let updated = execute(request, USERS_TABLE).await?;
        if updated.is_empty() {
            return Err(StoreError::NotFound(format!("User {}", user.id)));
        }
        info!("Updated user {} ({})", user.name, user.id);
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), StoreError> {
        let request = self.client.from(USERS_TABLE).delete().eq("id", user_id);

        let deleted = execute(request, USERS_TABLE).await?;
        if deleted.is_empty() {
            return Err(StoreError::NotFound(format!("User {}", user_id)));
        }
        info!("Deleted user {}", user_id);
        Ok(())
    }
}

#[async_trait]
impl PaymentStorage for SupabaseStore {
    async fn list_payments(&self) -> Result<Vec<Payment>, StoreError> {
        let request = self
            .client
            .from(PAYMENTS_TABLE)
            .select("*")
            .order("payment_date.desc");
        let rows = execute(request, PAYMENTS_TABLE).await?;
        Ok(decode_rows(rows, PAYMENTS_TABLE))
    }

    async fn store_payment(&self, payment: &Payment) -> Result<(), StoreError> {
        let request = self
            .client
            .from(PAYMENTS_TABLE)
            .insert(serde_json::to_string(payment)?);
        execute(request, PAYMENTS_TABLE).await?;
        info!(
            "Stored payment {} of {} for user {} ({})",
            payment.id, payment.amount, payment.user_id, payment.paid_for_month
        );
        Ok(())
    }

    async fn delete_payments_for_user(&self, user_id: &str) -> Result<u32, StoreError> {
        let request = self.client.from(PAYMENTS_TABLE).delete().eq("user_id", user_id);
        let deleted = execute(request, PAYMENTS_TABLE).await?;
        Ok(deleted.len() as u32)
    }
}
