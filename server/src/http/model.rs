use chrono::{DateTime, Utc};
use serde::Serialize;
use suncart::gateway::{OrderSummary, PaymentStatusResponse};

/// Terminal state of a payment callback as rendered to the storefront
/// UI. Never carries raw processor internals or exception text.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResolutionResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_reference_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_date_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_gateway_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatusResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderSummary>,
    /// When true the UI offers a fresh checkout, never a resume of the
    /// same gateway session.
    pub retry_checkout: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<String>,
}
