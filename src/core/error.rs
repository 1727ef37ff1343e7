use thiserror::Error;

use super::types::{MAX_YEARS, MIN_YEARS};

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ValidationError {
    #[error(
        "years must be between {min} and {max}, got {years}",
        min = MIN_YEARS,
        max = MAX_YEARS
    )]
    OutOfRange { years: i64 },
    #[error("{field} has an invalid magnitude: {value}")]
    InvalidMagnitude { field: &'static str, value: f64 },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::OutOfRange { .. } => "years",
            ValidationError::InvalidMagnitude { field, .. } => *field,
        }
    }
}
