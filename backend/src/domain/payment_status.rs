//! Derives who has paid for which month.
//!
//! Status is recomputed from the full user and payment lists on every call;
//! nothing is cached between calls.

use std::collections::HashSet;

use shared::{MonthId, Payment, User, UserWithPaymentStatus};

use super::clock::Clock;
use super::months::current_month;

/// The pair of months a status record reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetMonths {
    pub current: MonthId,
    pub previous: MonthId,
}

impl TargetMonths {
    pub fn new(current: MonthId, previous: MonthId) -> Self {
        Self { current, previous }
    }

    /// The conventional targets: this month and last month, from a single
    /// reading of the clock
    pub fn from_clock(clock: &dyn Clock) -> Self {
        let current = current_month(clock);
        Self::new(current, current.pred())
    }
}

/// One status record per user, in input order.
///
/// A user has paid for a month when at least one payment carries their ID and
/// that month in `paid_for_month`. Several payments for the same month still
/// count once.
pub fn compute_payment_status(
    users: &[User],
    payments: &[Payment],
    targets: &TargetMonths,
) -> Vec<UserWithPaymentStatus> {
    let current = targets.current.to_string();
    let previous = targets.previous.to_string();

    let paid: HashSet<(&str, &str)> = payments
        .iter()
        .map(|p| (p.user_id.as_str(), p.paid_for_month.as_str()))
        .collect();

    users
        .iter()
        .map(|user| UserWithPaymentStatus {
            user: user.clone(),
            has_paid_for_current_month: paid.contains(&(user.id.as_str(), current.as_str())),
            has_paid_for_previous_month: paid.contains(&(user.id.as_str(), previous.as_str())),
        })
        .collect()
}
