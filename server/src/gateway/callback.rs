//! Ingestion of the processor's return navigation.
//!
//! The processor sends the browser back with `payment` and `signature`
//! query parameters. Both are opaque; the client only checks that they
//! are present before forwarding them to the backend. A malformed
//! callback never reaches the backend.

use serde::Deserialize;
use url::Url;

use crate::error::PaymentError;

/// Raw query parameters of the callback URL, before presence checks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    pub payment: Option<String>,
    pub signature: Option<String>,
    pub custom_fields: Option<String>,
}

/// A callback with both required parameters present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackPayload {
    pub payment: String,
    pub signature: String,
    pub custom_fields: Option<String>,
}

impl CallbackPayload {
    pub fn from_query(query: CallbackQuery) -> Result<Self, PaymentError> {
        let payment = query.payment.filter(|value| !value.is_empty());
        let signature = query.signature.filter(|value| !value.is_empty());
        match (payment, signature) {
            (Some(payment), Some(signature)) => Ok(Self {
                payment,
                signature,
                custom_fields: query.custom_fields.filter(|value| !value.is_empty()),
            }),
            _ => Err(PaymentError::MissingCallbackParams),
        }
    }

    pub fn from_url(url: &Url) -> Result<Self, PaymentError> {
        let mut query = CallbackQuery::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "payment" => query.payment = Some(value.into_owned()),
                "signature" => query.signature = Some(value.into_owned()),
                "custom_fields" => query.custom_fields = Some(value.into_owned()),
                _ => {}
            }
        }
        Self::from_query(query)
    }
}
