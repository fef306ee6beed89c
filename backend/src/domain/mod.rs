//! # Domain Module
//!
//! Business logic for the membership tracker, independent of the store and
//! of the HTTP layer.
//!
//! ## Module Organization
//!
//! - **months**, **clock**: month identifiers, rolling windows and display
//!   formatting, all driven by an injectable [`Clock`]
//! - **payment_status**: who has paid for the current and previous month
//! - **filters**: user search and payment filtering
//! - **aggregation**: newest-first ordering and per-month totals
//! - **validation**: form rules for new users and payments
//! - **user_service**, **payment_service**, **dashboard**: services that load
//!   collections from storage and run the pure functions above over them
//!
//! ## Business Rules
//!
//! - A user has paid for a month when any payment carries their ID and that
//!   month; amount and count do not matter
//! - Payments whose user no longer exists never match a filter and show as
//!   "Unknown User" on the dashboard
//! - Deleting a user deletes their payments

pub mod aggregation;
pub mod clock;
pub mod dashboard;
pub mod error;
pub mod filters;
pub mod months;
pub mod payment_service;
pub mod payment_status;
pub mod user_service;
pub mod validation;

pub use aggregation::{pending_users, sort_payments_descending, total_for_month, MonthSelector};
pub use clock::{Clock, FixedClock, SystemClock};
pub use dashboard::{build_dashboard_summary, DashboardService};
pub use error::DomainError;
pub use filters::{filter_payments, filter_users, PaymentFilters};
pub use months::{current_month, display_name, format_date, format_date_time, month_window, previous_month};
pub use payment_service::PaymentService;
pub use payment_status::{compute_payment_status, TargetMonths};
pub use user_service::UserService;
