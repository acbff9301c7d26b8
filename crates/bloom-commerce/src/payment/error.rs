//! Payment validation errors.

use crate::error::FieldErrors;
use crate::payment::PaymentMethod;
use thiserror::Error;

/// Errors raised while validating simulated payment input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaymentError {
    /// Nothing selected yet.
    #[error("No payment method selected")]
    NoMethodSelected,

    /// A method is selected but its form was never filled in.
    #[error("Payment details missing for {}", .0.display_name())]
    MissingDetails(PaymentMethod),

    /// The method's form has field errors.
    #[error("Invalid {} details: {errors}", method.display_name())]
    Invalid {
        method: PaymentMethod,
        errors: FieldErrors,
    },
}

impl PaymentError {
    /// Field messages, empty for the non-field variants.
    pub fn messages(&self) -> Vec<String> {
        match self {
            PaymentError::Invalid { errors, .. } => {
                errors.iter().map(|(_, msg)| msg.to_string()).collect()
            }
            other => vec![other.to_string()],
        }
    }
}
