use std::sync::Arc;

use shared::{CreatePaymentRequest, Payment, PaymentListResponse, PaymentResponse};
use tracing::{info, warn};

use super::aggregation::sort_payments_descending;
use super::error::DomainError;
use super::filters::{filter_payments, PaymentFilters};
use super::validation::validate_payment;
use crate::storage::{PaymentStorage, UserStorage};

/// Service for recording and querying payments
#[derive(Clone)]
pub struct PaymentService {
    payments: Arc<dyn PaymentStorage>,
    users: Arc<dyn UserStorage>,
}

impl PaymentService {
    pub fn new(payments: Arc<dyn PaymentStorage>, users: Arc<dyn UserStorage>) -> Self {
        Self { payments, users }
    }

    /// Payments of known users matching `filters`, most recent first
    pub async fn list_payments(&self, filters: &PaymentFilters) -> Result<PaymentListResponse, DomainError> {
        info!("Listing payments with filters: {:?}", filters);

        let (payments, users) = tokio::try_join!(self.payments.list_payments(), self.users.list_users())?;
        let matching = filter_payments(&payments, filters, &users);

        if filters.is_empty() && matching.len() < payments.len() {
            warn!("{} payments reference unknown users", payments.len() - matching.len());
        }

        let payments = sort_payments_descending(&matching);
        info!("Found {} payments", payments.len());
        Ok(PaymentListResponse { payments })
    }

    /// Record a payment for an existing user
    pub async fn create_payment(&self, request: CreatePaymentRequest) -> Result<PaymentResponse, DomainError> {
        info!(
            "Creating payment: user_id={}, amount={}, month={}",
            request.user_id, request.amount, request.paid_for_month
        );

        validate_payment(&request).map_err(DomainError::Validation)?;

        let users = self.users.list_users().await?;
        if !users.iter().any(|u| u.id == request.user_id) {
            warn!("Payment references unknown user: {}", request.user_id);
            return Err(DomainError::NotFound(format!("User {}", request.user_id)));
        }

        let payment = Payment {
            id: Payment::generate_id(),
            user_id: request.user_id,
            payment_date: request.payment_date.trim().to_string(),
            payment_mode: request.payment_mode,
            amount: request.amount,
            paid_for_month: request.paid_for_month.trim().to_string(),
            remarks: request
                .remarks
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
        };
        self.payments.store_payment(&payment).await?;

        info!("Created payment: {} for user {}", payment.id, payment.user_id);

        let payments = self.payments.list_payments().await?;
        Ok(PaymentResponse {
            payment,
            payments,
            success_message: "Payment recorded successfully".to_string(),
        })
    }
}
