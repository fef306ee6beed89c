//! Figures for the dashboard page: collections for this month and last
//! month, the trend between them, and the latest payments.

use std::collections::HashMap;
use std::sync::Arc;

use shared::{
    CollectionTrend, DashboardSummary, MonthId, MonthSummary, Payment, RecentPayment, User, UserWithPaymentStatus,
};
use tracing::{info, warn};

use super::aggregation::{sort_payments_descending, total_for_month};
use super::clock::Clock;
use super::error::DomainError;
use super::months::{display_name, display_name_str, format_date_time};
use super::payment_status::{compute_payment_status, TargetMonths};
use crate::storage::{PaymentStorage, UserStorage};

/// How many payments the "recent payments" panel shows
pub const RECENT_PAYMENTS: usize = 5;

pub const UNKNOWN_USER: &str = "Unknown User";

#[derive(Clone)]
pub struct DashboardService {
    users: Arc<dyn UserStorage>,
    payments: Arc<dyn PaymentStorage>,
}

impl DashboardService {
    pub fn new(users: Arc<dyn UserStorage>, payments: Arc<dyn PaymentStorage>) -> Self {
        Self { users, payments }
    }

    /// Load both collections and summarise them for the clock's current month
    pub async fn summary(&self, clock: &dyn Clock) -> Result<DashboardSummary, DomainError> {
        let (users, payments) = tokio::try_join!(self.users.list_users(), self.payments.list_payments())?;
        let targets = TargetMonths::from_clock(clock);

        info!(
            "Building dashboard for {} from {} users and {} payments",
            targets.current,
            users.len(),
            payments.len()
        );
        Ok(build_dashboard_summary(&users, &payments, &targets))
    }
}

/// Pure summary over already-loaded collections
pub fn build_dashboard_summary(users: &[User], payments: &[Payment], targets: &TargetMonths) -> DashboardSummary {
    let statuses = compute_payment_status(users, payments, targets);

    let current_pending = statuses.iter().filter(|s| !s.has_paid_for_current_month).count();
    let previous_pending = statuses.iter().filter(|s| !s.has_paid_for_previous_month).count();

    let current_month = month_summary(payments, &statuses, &targets.current, current_pending);
    let previous_month = month_summary(payments, &statuses, &targets.previous, previous_pending);
    let trend = collection_trend(current_month.total_collected, previous_month.total_collected);

    DashboardSummary {
        total_users: users.len(),
        current_month,
        previous_month,
        trend,
        recent_payments: recent_payments(payments, users, RECENT_PAYMENTS),
    }
}

fn month_summary(
    payments: &[Payment],
    statuses: &[UserWithPaymentStatus],
    month: &MonthId,
    pending: usize,
) -> MonthSummary {
    MonthSummary {
        month: *month,
        month_name: display_name(month),
        total_collected: total_for_month(payments, month),
        paid_users: statuses.len() - pending,
        pending_users: pending,
    }
}

/// Percentage change from `previous` to `current`, rounded to a whole number.
/// Zero when nothing was collected previously.
pub fn collection_trend(current: f64, previous: f64) -> CollectionTrend {
    let percent = if previous == 0.0 {
        0
    } else {
        ((current - previous) / previous * 100.0).round() as i64
    };

    CollectionTrend {
        percent,
        is_positive: current >= previous,
    }
}

/// The `limit` most recent payments with their payer's name
pub fn recent_payments(payments: &[Payment], users: &[User], limit: usize) -> Vec<RecentPayment> {
    let names: HashMap<&str, &str> = users.iter().map(|u| (u.id.as_str(), u.name.as_str())).collect();

    sort_payments_descending(payments)
        .into_iter()
        .take(limit)
        .map(|payment| {
            let user_name = match names.get(payment.user_id.as_str()) {
                Some(name) => name.to_string(),
                None => {
                    warn!("Payment {} references unknown user {}", payment.id, payment.user_id);
                    UNKNOWN_USER.to_string()
                }
            };
            RecentPayment {
                month_name: display_name_str(&payment.paid_for_month),
                paid_at: format_date_time(&payment.payment_date),
                user_name,
                payment,
            }
        })
        .collect()
}
