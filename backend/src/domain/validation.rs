//! Input validation for user and payment requests.
//!
//! Every problem in a request is reported, not just the first one.

use chrono::NaiveDate;
use shared::{CreatePaymentRequest, CreateUserRequest, MonthId, ValidationError};

/// Validate every field of a new user
pub fn validate_user(request: &CreateUserRequest) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    require(&mut errors, &request.name, "Name");

    if request.email.trim().is_empty() {
        errors.push(ValidationError::Required("Email".to_string()));
    } else if !is_valid_email(&request.email) {
        errors.push(ValidationError::InvalidEmail);
    }

    if request.mobile.trim().is_empty() {
        errors.push(ValidationError::Required("Mobile".to_string()));
    } else if !is_valid_mobile(&request.mobile) {
        errors.push(ValidationError::InvalidMobile);
    }

    require(&mut errors, &request.address, "Address");
    require(&mut errors, &request.seat_no, "Seat No.");

    if request.joining_date.trim().is_empty() {
        errors.push(ValidationError::Required("Joining Date".to_string()));
    } else if !is_valid_date(&request.joining_date) {
        errors.push(ValidationError::InvalidDate("Joining Date".to_string()));
    }

    into_result(errors)
}

/// Validate a new payment. Whether the user exists is checked by the caller.
pub fn validate_payment(request: &CreatePaymentRequest) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    require(&mut errors, &request.user_id, "User");
    require(&mut errors, &request.payment_date, "Payment date");

    if !request.amount.is_finite() || request.amount <= 0.0 {
        errors.push(ValidationError::AmountNotPositive);
    }

    if request.paid_for_month.trim().is_empty() {
        errors.push(ValidationError::Required("Month".to_string()));
    } else if request.paid_for_month.parse::<MonthId>().is_err() {
        errors.push(ValidationError::InvalidMonth(request.paid_for_month.clone()));
    }

    into_result(errors)
}

fn require(errors: &mut Vec<ValidationError>, value: &str, label: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::Required(label.to_string()));
    }
}

fn into_result(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `local@domain.tld` with no whitespace and a single `@`. Any dot in the
/// domain with text on both sides qualifies, so `a@b.c.` passes.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Exactly ten ASCII digits
pub fn is_valid_mobile(mobile: &str) -> bool {
    mobile.len() == 10 && mobile.bytes().all(|b| b.is_ascii_digit())
}

/// A real calendar date in YYYY-MM-DD form
pub fn is_valid_date(date: &str) -> bool {
    date.len() == 10 && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::PaymentMode;

    fn valid_user() -> CreateUserRequest {
        CreateUserRequest {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            mobile: "5551234567".to_string(),
            address: "12 Library Road".to_string(),
            seat_no: "A-12".to_string(),
            joining_date: "2024-01-10".to_string(),
        }
    }

    fn valid_payment() -> CreatePaymentRequest {
        CreatePaymentRequest {
            user_id: "u1".to_string(),
            payment_date: "2024-03-05T10:30".to_string(),
            payment_mode: PaymentMode::Cash,
            amount: 500.0,
            paid_for_month: "2024-03".to_string(),
            remarks: None,
        }
    }

    #[test]
    fn test_valid_user_passes() {
        assert!(validate_user(&valid_user()).is_ok());
    }

    #[test]
    fn test_user_reports_every_problem() {
        let request = CreateUserRequest {
            name: "  ".to_string(),
            email: "not-an-email".to_string(),
            mobile: "12345".to_string(),
            address: String::new(),
            seat_no: String::new(),
            joining_date: "2024-02-30".to_string(),
        };

        let errors = validate_user(&request).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::Required("Name".to_string()),
                ValidationError::InvalidEmail,
                ValidationError::InvalidMobile,
                ValidationError::Required("Address".to_string()),
                ValidationError::Required("Seat No.".to_string()),
                ValidationError::InvalidDate("Joining Date".to_string()),
            ]
        );
    }

    #[test]
    fn test_email_rules() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("a@b@c.co"));
    }

    #[test]
    fn test_email_accepts_any_inner_dot() {
        assert!(is_valid_email("a@b.c."));
        assert!(is_valid_email("a@.b.co"));
        assert!(!is_valid_email("a@."));
        assert!(!is_valid_email("a@.."));
    }

    #[test]
    fn test_mobile_rules() {
        assert!(is_valid_mobile("5551234567"));
        assert!(!is_valid_mobile("555123456"));
        assert!(!is_valid_mobile("55512345678"));
        assert!(!is_valid_mobile("555-123-45"));
        assert!(!is_valid_mobile("５５５１２３４５６７"));
    }

    #[test]
    fn test_date_rules() {
        assert!(is_valid_date("2024-02-29"));
        assert!(!is_valid_date("2023-02-29"));
        assert!(!is_valid_date("2024-2-9"));
        assert!(!is_valid_date("10/01/2024"));
    }

    #[test]
    fn test_valid_payment_passes() {
        assert!(validate_payment(&valid_payment()).is_ok());
    }

    #[test]
    fn test_payment_amount_must_be_positive() {
        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let request = CreatePaymentRequest { amount, ..valid_payment() };
            assert_eq!(validate_payment(&request).unwrap_err(), vec![ValidationError::AmountNotPositive]);
        }
    }

    #[test]
    fn test_payment_requires_user_date_and_month() {
        let request = CreatePaymentRequest {
            user_id: String::new(),
            payment_date: String::new(),
            paid_for_month: String::new(),
            ..valid_payment()
        };

        assert_eq!(
            validate_payment(&request).unwrap_err(),
            vec![
                ValidationError::Required("User".to_string()),
                ValidationError::Required("Payment date".to_string()),
                ValidationError::Required("Month".to_string()),
            ]
        );
    }

    #[test]
    fn test_payment_month_must_be_well_formed() {
        let request = CreatePaymentRequest {
            paid_for_month: "2024-13".to_string(),
            ..valid_payment()
        };
        assert_eq!(
            validate_payment(&request).unwrap_err(),
            vec![ValidationError::InvalidMonth("2024-13".to_string())]
        );
    }
}
