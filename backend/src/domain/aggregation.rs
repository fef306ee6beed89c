//! Ordering and totals over the payment list.

use std::cmp::Reverse;

use serde::Deserialize;
use shared::{MonthId, Payment, UserWithPaymentStatus};

use super::months::parse_instant;

/// Which of the two status months a query is about
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthSelector {
    #[default]
    Current,
    Previous,
}

/// Payments ordered by `payment_date`, most recent first.
///
/// The sort is stable, so payments with the same timestamp keep their
/// relative order. Dates that cannot be parsed sort after every valid date.
pub fn sort_payments_descending(payments: &[Payment]) -> Vec<Payment> {
    let mut sorted = payments.to_vec();
    // Option orders None before Some, so reversing puts unparseable dates last
    sorted.sort_by_cached_key(|p| Reverse(parse_instant(&p.payment_date)));
    sorted
}

/// Sum of the amounts paid for `month`; zero when nothing was paid
pub fn total_for_month(payments: &[Payment], month: &MonthId) -> f64 {
    let key = month.to_string();
    payments
        .iter()
        .filter(|p| p.paid_for_month == key)
        .map(|p| p.amount)
        .sum()
}

/// Status records of users who have not paid for the selected month
pub fn pending_users(statuses: &[UserWithPaymentStatus], selector: MonthSelector) -> Vec<UserWithPaymentStatus> {
    statuses
        .iter()
        .filter(|s| match selector {
            MonthSelector::Current => !s.has_paid_for_current_month,
            MonthSelector::Previous => !s.has_paid_for_previous_month,
        })
        .cloned()
        .collect()
}
