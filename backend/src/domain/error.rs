use shared::ValidationError;
use thiserror::Error;

use crate::storage::StoreError;

/// Failures surfaced by the domain services
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{}", validation_summary(.0))]
    Validation(Vec<ValidationError>),
    #[error("{0} not found")]
    NotFound(String),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for DomainError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(what) => DomainError::NotFound(what),
            other => DomainError::Store(other),
        }
    }
}

fn validation_summary(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_joins_every_error() {
        let error = DomainError::Validation(vec![
            ValidationError::Required("Name".to_string()),
            ValidationError::InvalidMobile,
        ]);
        assert_eq!(error.to_string(), "Name is required; Mobile should be 10 digits");
    }

    #[test]
    fn test_store_not_found_becomes_domain_not_found() {
        let error = DomainError::from(StoreError::NotFound("User u1".to_string()));
        assert!(matches!(error, DomainError::NotFound(ref what) if what == "User u1"));
        assert_eq!(error.to_string(), "User u1 not found");
    }

    #[test]
    fn test_other_store_errors_pass_through() {
        let error = DomainError::from(StoreError::Query("boom".to_string()));
        assert_eq!(error.to_string(), "Backend request failed: boom");
    }
}
