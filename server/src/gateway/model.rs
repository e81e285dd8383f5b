//! Wire types for the verification backend and the order subsystem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::callback::CallbackPayload;

/// Body of `POST /api/payment/verify-callback`. The three values are
/// forwarded exactly as they arrived on the return URL; an absent
/// `custom_fields` is sent as an explicit `null`.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyCallbackParams<'a> {
    pub payment: &'a str,
    pub signature: &'a str,
    pub custom_fields: Option<&'a str>,
}

impl<'a> VerifyCallbackParams<'a> {
    pub fn from_payload(payload: &'a CallbackPayload) -> Self {
        Self {
            payment: &payload.payment,
            signature: &payload.signature,
            custom_fields: payload.custom_fields.as_deref(),
        }
    }
}

/// The backend's verdict on a payment callback. The only structure the
/// client treats as authoritative regarding payment success.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub success: bool,
    pub order_id: String,
    #[serde(default)]
    pub order_reference_number: Option<String>,
    #[serde(default)]
    pub transaction_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status_code: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub payment_gateway_used: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusResponse {
    pub order_id: String,
    pub payment_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: String,
    pub order_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_custom_fields_serializes_as_explicit_null() {
        let payload = CallbackPayload {
            payment: "abc".to_string(),
            signature: "xyz".to_string(),
            custom_fields: None,
        };
        let body = serde_json::to_value(VerifyCallbackParams::from_payload(&payload)).unwrap();
        assert_eq!(
            body,
            json!({"payment": "abc", "signature": "xyz", "custom_fields": null})
        );
    }

    #[test]
    fn verification_result_parses_a_minimal_backend_response() {
        let result: VerificationResult =
            serde_json::from_value(json!({"success": true, "orderId": "ORD-1"})).unwrap();
        assert!(result.success);
        assert_eq!(result.order_id, "ORD-1");
        assert_eq!(result.status_code, None);
        assert_eq!(result.comment, None);
    }

    #[test]
    fn verification_result_parses_a_full_decline() {
        let result: VerificationResult = serde_json::from_value(json!({
            "success": false,
            "orderId": "ORD-2",
            "orderReferenceNumber": "REF-9",
            "transactionDateTime": "2026-08-30T10:15:00Z",
            "statusCode": "15",
            "comment": "Insufficient funds",
            "paymentGatewayUsed": "visa",
        }))
        .unwrap();
        assert!(!result.success);
        assert_eq!(result.status_code.as_deref(), Some("15"));
        assert_eq!(result.comment.as_deref(), Some("Insufficient funds"));
    }
}
