pub mod error;
pub mod gateway;

pub use error::PaymentError;
