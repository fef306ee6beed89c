use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A member of the organisation whose monthly dues are tracked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Ten digit mobile number
    pub mobile: String,
    pub address: String,
    pub seat_no: String,
    pub joining_date: String, // ISO 8601 date format (YYYY-MM-DD)
}

/// How a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMode {
    Cash,
    Card,
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    Other,
}

/// A payment recorded against a user for a billing month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    /// ID of the user this payment belongs to. May refer to a user that no
    /// longer exists.
    pub user_id: String,
    /// When the money changed hands (ISO 8601 date-time)
    pub payment_date: String,
    pub payment_mode: PaymentMode,
    pub amount: f64,
    /// Billing month this payment settles, "YYYY-MM"
    pub paid_for_month: String,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Calendar month identifier rendered as "YYYY-MM".
///
/// Ordering is chronological, which matches the lexicographic ordering of the
/// zero-padded string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthId {
    year: i32,
    month: u32,
}

/// A user together with their paid flags for the current and previous month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWithPaymentStatus {
    #[serde(flatten)]
    pub user: User,
    pub has_paid_for_current_month: bool,
    pub has_paid_for_previous_month: bool,
}

/// Request for creating a new user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub address: String,
    pub seat_no: String,
    pub joining_date: String,
}

/// Request for updating an existing user. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub seat_no: Option<String>,
    pub joining_date: Option<String>,
}

/// Response after creating or updating a user, carrying the refreshed list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: User,
    pub users: Vec<User>,
    pub success_message: String,
}

/// Response containing a list of users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
}

/// Response after deleting a user. Both collections are refreshed since the
/// user's payments go with them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    pub deleted_user_id: String,
    pub users: Vec<User>,
    pub payments: Vec<Payment>,
    pub success_message: String,
}

/// Request for recording a payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub user_id: String,
    pub payment_date: String,
    pub payment_mode: PaymentMode,
    pub amount: f64,
    pub paid_for_month: String,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Response after recording a payment, carrying the refreshed list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub payment: Payment,
    pub payments: Vec<Payment>,
    pub success_message: String,
}

/// Response containing a list of payments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentListResponse {
    pub payments: Vec<Payment>,
}

/// Query parameters accepted when listing payments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentFilterRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Payment mode label, e.g. "Bank Transfer"
    pub mode: Option<String>,
    pub date: Option<String>,
}

/// Users who have not paid for a given month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingUsersResponse {
    pub month: MonthId,
    pub month_name: String,
    pub users: Vec<UserWithPaymentStatus>,
}

/// Collection figures for one month on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub month: MonthId,
    pub month_name: String,
    pub total_collected: f64,
    pub paid_users: usize,
    pub pending_users: usize,
}

/// Month-over-month change in collections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionTrend {
    /// Rounded percentage change from the previous month (0 when nothing was
    /// collected in the previous month)
    pub percent: i64,
    pub is_positive: bool,
}

/// A payment as shown in the "recent payments" panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentPayment {
    pub payment: Payment,
    pub user_name: String,
    pub month_name: String,
    /// `payment_date` formatted for display, e.g. "Mar 5, 2024 10:30 AM"
    pub paid_at: String,
}

/// Everything the dashboard page needs in one response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_users: usize,
    pub current_month: MonthSummary,
    pub previous_month: MonthSummary,
    pub trend: CollectionTrend,
    pub recent_payments: Vec<RecentPayment>,
}

/// A selectable billing month with its display label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthOption {
    pub id: MonthId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthOptionsResponse {
    pub months: Vec<MonthOption>,
}

/// Specific validation errors for user and payment forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationError {
    /// A required field was empty; carries the field's display label
    Required(String),
    InvalidEmail,
    InvalidMobile,
    /// A date field did not hold a valid date; carries the field's display label
    InvalidDate(String),
    AmountNotPositive,
    InvalidMonth(String),
}

/// Error body returned by the REST API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ValidationError>,
}

impl User {
    /// Generate a new random user ID
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

impl Payment {
    /// Generate a new random payment ID
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

impl PaymentMode {
    pub const ALL: [PaymentMode; 5] = [
        PaymentMode::Cash,
        PaymentMode::Card,
        PaymentMode::Upi,
        PaymentMode::BankTransfer,
        PaymentMode::Other,
    ];

    /// Label used on the wire and in the UI
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::Card => "Card",
            PaymentMode::Upi => "UPI",
            PaymentMode::BankTransfer => "Bank Transfer",
            PaymentMode::Other => "Other",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMode {
    type Err = UnknownPaymentMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMode::ALL
            .into_iter()
            .find(|mode| mode.label() == s)
            .ok_or_else(|| UnknownPaymentMode(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownPaymentMode(pub String);

impl fmt::Display for UnknownPaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown payment mode: {}", self.0)
    }
}

impl std::error::Error for UnknownPaymentMode {}

impl MonthId {
    /// Earliest representable month, `0000-01`
    pub const MIN: MonthId = MonthId { year: 0, month: 1 };
    /// Latest representable month, `9999-12`
    pub const MAX: MonthId = MonthId { year: 9999, month: 12 };

    /// Build a month identifier, rejecting months outside 1..=12 and years
    /// that do not fit in four digits
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (0..=9999).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month containing `date`, clamped to [`MonthId::MIN`]..=[`MonthId::MAX`]
    pub fn from_date(date: NaiveDate) -> Self {
        match date.year() {
            year if year < Self::MIN.year => Self::MIN,
            year if year > Self::MAX.year => Self::MAX,
            year => Self {
                year,
                month: date.month(),
            },
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The calendar month immediately before this one. Saturates at
    /// [`MonthId::MIN`].
    pub fn pred(&self) -> Self {
        if *self == Self::MIN {
            *self
        } else if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    /// The calendar month immediately after this one. Saturates at
    /// [`MonthId::MAX`].
    pub fn succ(&self) -> Self {
        if *self == Self::MAX {
            *self
        } else if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }
}

impl fmt::Display for MonthId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthId {
    type Err = MonthIdError;

    /// Parse a strict "YYYY-MM" string
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s.split_once('-').ok_or(MonthIdError::InvalidFormat)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(MonthIdError::InvalidFormat);
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(MonthIdError::InvalidFormat);
        }

        let year = year.parse::<i32>().map_err(|_| MonthIdError::InvalidFormat)?;
        let month = month.parse::<u32>().map_err(|_| MonthIdError::InvalidFormat)?;

        MonthId::new(year, month).ok_or(MonthIdError::InvalidMonth(month))
    }
}

impl TryFrom<String> for MonthId {
    type Error = MonthIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthId> for String {
    fn from(value: MonthId) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MonthIdError {
    InvalidFormat,
    InvalidMonth(u32),
}

impl fmt::Display for MonthIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthIdError::InvalidFormat => write!(f, "Month must be in YYYY-MM format"),
            MonthIdError::InvalidMonth(month) => write!(f, "Invalid month number: {}", month),
        }
    }
}

impl std::error::Error for MonthIdError {}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Required(field) => write!(f, "{} is required", field),
            ValidationError::InvalidEmail => write!(f, "Email is invalid"),
            ValidationError::InvalidMobile => write!(f, "Mobile should be 10 digits"),
            ValidationError::InvalidDate(field) => write!(f, "{} must be a valid date", field),
            ValidationError::AmountNotPositive => write!(f, "Amount must be greater than 0"),
            ValidationError::InvalidMonth(value) => write!(f, "Invalid billing month: {}", value),
        }
    }
}

impl std::error::Error for ValidationError {}
