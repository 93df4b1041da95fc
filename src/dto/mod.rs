use rust_decimal::Decimal;
use validator::{ValidateEmail, ValidationError};

pub mod auth;
pub mod checkout;
pub mod menu;
pub mod orders;
pub mod reservations;
pub mod settings;

pub(crate) fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("non_negative"));
    }
    Ok(())
}

/// Matches the optional-email contract: absent and empty both mean "no
/// email", anything else must parse as one.
pub(crate) fn validate_email_or_empty(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_email() {
        return Ok(());
    }
    Err(ValidationError::new("email"))
}
