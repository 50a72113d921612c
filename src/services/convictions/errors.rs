use thiserror::Error;

use crate::core::AppError;

/// Business rule failures around convictions and their custody records.
#[derive(Error, Debug)]
pub enum ConvictionError {
    #[error("Expected offender {offender_id} to have a single custody related event but found {count} events")]
    SingleActiveCustodyConvictionNotFound { offender_id: i64, count: usize },

    #[error("duplicate active custody conviction count was {0}, should be 1")]
    DuplicateConvictionsForBookingNumber(usize),

    #[error("duplicate active custody conviction count was {0}, should be 1")]
    DuplicateConvictionsForSentenceDate(usize),

    #[error("{0} is not a valid custody key date")]
    CustodyTypeCodeIsNotValid(String),

    #[error("Custody for event {0} not found")]
    CustodyNotFound(i64),

    #[error(transparent)]
    App(#[from] AppError),
}

pub type ConvictionResult<T> = Result<T, ConvictionError>;

impl From<ConvictionError> for AppError {
    fn from(error: ConvictionError) -> Self {
        match error {
            ConvictionError::App(inner) => inner,
            ConvictionError::CustodyNotFound(_) => AppError::NotFound(error.to_string()),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}
