use async_trait::async_trait;
use shared::Payment;
use tracing::info;

use super::connection::{CsvConnection, PAYMENT_HEADERS};
use crate::domain::aggregation::sort_payments_descending;
use crate::storage::error::StoreError;
use crate::storage::traits::PaymentStorage;

/// CSV-based payment repository backed by `payments.csv`
#[derive(Clone)]
pub struct CsvPaymentRepository {
    connection: CsvConnection,
}

impl CsvPaymentRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_payments(&self) -> Result<Vec<Payment>, StoreError> {
        self.connection.read_records(&self.connection.payments_file_path())
    }

    fn write_payments(&self, payments: &[Payment]) -> Result<(), StoreError> {
        self.connection
            .write_records(&self.connection.payments_file_path(), &PAYMENT_HEADERS, payments)
    }
}

#[async_trait]
impl PaymentStorage for CsvPaymentRepository {
    async fn list_payments(&self) -> Result<Vec<Payment>, StoreError> {
        let payments = self.read_payments()?;
        Ok(sort_payments_descending(&payments))
    }

    async fn store_payment(&self, payment: &Payment) -> Result<(), StoreError> {
        let _guard = self.connection.lock().await;

        let mut payments = self.read_payments()?;
        if payments.iter().any(|p| p.id == payment.id) {
            return Err(StoreError::Query(format!("Payment {} already exists", payment.id)));
        }
        payments.push(payment.clone());
        self.write_payments(&payments)?;

        info!(
            "Stored payment {} of {} for user {} ({})",
            payment.id, payment.amount, payment.user_id, payment.paid_for_month
        );
        Ok(())
    }

    async fn delete_payments_for_user(&self, user_id: &str) -> Result<u32, StoreError> {
        let _guard = self.connection.lock().await;

        let mut payments = self.read_payments()?;
        let before = payments.len();
        payments.retain(|p| p.user_id != user_id);
        let removed = (before - payments.len()) as u32;

        if removed > 0 {
            self.write_payments(&payments)?;
            info!("Deleted {} payments for user {}", removed, user_id);
        }
        Ok(removed)
    }
}
