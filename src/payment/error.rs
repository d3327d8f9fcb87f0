use thiserror::Error;

use crate::upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Missing or empty field: {0}")]
    MissingField(&'static str),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid order request: {0}")]
    InvalidOrder(String),

    #[error("Payment signature verification failed")]
    SignatureMismatch,

    #[error("Failed to create order: {0}")]
    Upstream(#[from] UpstreamError),
}
