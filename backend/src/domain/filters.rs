//! Search and filter predicates for the user and payment lists.

use std::collections::HashMap;

use shared::{Payment, PaymentFilterRequest, User};

/// Criteria for narrowing the payment list. Every criterion is optional and
/// an absent or empty one places no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentFilters {
    /// Case-insensitive substring of the payer's email
    pub email_contains: Option<String>,
    /// Substring of the payer's mobile number
    pub phone_contains: Option<String>,
    /// Exact payment mode label
    pub mode_equals: Option<String>,
    /// Substring of the stored payment date
    pub date_contains: Option<String>,
}

impl From<PaymentFilterRequest> for PaymentFilters {
    fn from(request: PaymentFilterRequest) -> Self {
        Self {
            email_contains: request.email,
            phone_contains: request.phone,
            mode_equals: request.mode,
            date_contains: request.date,
        }
    }
}

impl PaymentFilters {
    /// True when no criterion would constrain the result
    pub fn is_empty(&self) -> bool {
        [&self.email_contains, &self.phone_contains, &self.mode_equals, &self.date_contains]
            .iter()
            .all(|criterion| active(criterion).is_none())
    }

    fn matches(&self, payment: &Payment, payer: &User) -> bool {
        let email_ok = active(&self.email_contains)
            .map_or(true, |email| payer.email.to_lowercase().contains(&email.to_lowercase()));
        let phone_ok = active(&self.phone_contains).map_or(true, |phone| payer.mobile.contains(phone));
        let mode_ok = active(&self.mode_equals).map_or(true, |mode| payment.payment_mode.label() == mode);
        let date_ok = active(&self.date_contains).map_or(true, |date| payment.payment_date.contains(date));

        email_ok && phone_ok && mode_ok && date_ok
    }
}

/// A criterion that is present and non-empty
fn active(criterion: &Option<String>) -> Option<&str> {
    criterion.as_deref().filter(|value| !value.is_empty())
}

/// Users whose name or email contains `search_term` (ignoring case) or whose
/// mobile number contains it verbatim. An empty term keeps every user.
pub fn filter_users(users: &[User], search_term: &str) -> Vec<User> {
    if search_term.is_empty() {
        return users.to_vec();
    }

    let needle = search_term.to_lowercase();
    users
        .iter()
        .filter(|user| {
            user.name.to_lowercase().contains(&needle)
                || user.email.to_lowercase().contains(&needle)
                || user.mobile.contains(search_term)
        })
        .cloned()
        .collect()
}

/// Payments whose payer exists and satisfies every supplied criterion.
///
/// Payments that reference an unknown user are dropped whatever the filters.
pub fn filter_payments(payments: &[Payment], filters: &PaymentFilters, users: &[User]) -> Vec<Payment> {
    let users_by_id: HashMap<&str, &User> = users.iter().map(|u| (u.id.as_str(), u)).collect();

    payments
        .iter()
        .filter(|payment| match users_by_id.get(payment.user_id.as_str()) {
            Some(payer) => filters.matches(payment, payer),
            None => false,
        })
        .cloned()
        .collect()
}
