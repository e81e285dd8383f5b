use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment callback is missing required parameters")]
    MissingCallbackParams,

    #[error("Verification backend error: {0}")]
    Verification(#[from] crate::gateway::VerifyClientError),

    #[error("Order service error: {0}")]
    Orders(#[from] crate::gateway::OrderClientError),

    #[error("Payment request failed validation: {}", .0.join("; "))]
    InvalidRequest(Vec<String>),

    #[error("{0}")]
    Other(String),
}
