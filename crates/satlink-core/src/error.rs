//! Link budget error types

use thiserror::Error;

/// Result type for link budget and simulation operations
pub type LinkResult<T> = Result<T, LinkError>;

/// Errors that can occur while evaluating a link budget or buffer simulation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinkError {
    /// An input lies outside its physical domain
    #[error("Invalid parameter `{field}` = {value}: {reason}")]
    InvalidParameter {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A formula produced a non-finite intermediate value
    #[error("Numeric domain error computing {quantity}: got {value}")]
    NumericDomainError { quantity: &'static str, value: f64 },
}

impl LinkError {
    /// Name of the offending input field or derived quantity.
    pub fn subject(&self) -> &'static str {
        match self {
            LinkError::InvalidParameter { field, .. } => field,
            LinkError::NumericDomainError { quantity, .. } => quantity,
        }
    }

    /// Check if this error was caused by user-supplied input
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, LinkError::InvalidParameter { .. })
    }
}

/// Require `value > 0` and finite.
pub fn require_positive(field: &'static str, value: f64) -> LinkResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(LinkError::InvalidParameter {
            field,
            value,
            reason: "must be a finite value greater than zero",
        })
    }
}

/// Require `value >= 0` and finite.
pub fn require_non_negative(field: &'static str, value: f64) -> LinkResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(LinkError::InvalidParameter {
            field,
            value,
            reason: "must be a finite value not less than zero",
        })
    }
}

/// Require a finite value of any sign.
pub fn require_finite(field: &'static str, value: f64) -> LinkResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LinkError::InvalidParameter {
            field,
            value,
            reason: "must be finite",
        })
    }
}

/// Require `value` in the half-open range `(0, 1]`.
pub fn require_unit_fraction(field: &'static str, value: f64) -> LinkResult<f64> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(LinkError::InvalidParameter {
            field,
            value,
            reason: "must lie in (0, 1]",
        })
    }
}

/// Reject a non-finite intermediate result.
pub fn ensure_finite(quantity: &'static str, value: f64) -> LinkResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LinkError::NumericDomainError { quantity, value })
    }
}
