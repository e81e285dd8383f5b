//! Payment-gateway redirect and verification handshake.
//!
//! Outbound, the checkout flow validates a [`PaymentRequest`] and hands
//! the browser off to the processor via a [`RedirectCommand`]. Inbound,
//! the processor's return navigation is ingested, forwarded to the
//! trusted backend for verification, and reconciled into a terminal
//! [`PaymentPhase`]. The client never inspects the encrypted payload or
//! treats redirect parameters as proof of payment.

use log::{error, warn};

mod callback;
pub mod catalog;
mod config;
mod model;
mod orders;
mod reconcile;
mod redirect;
mod request;
mod verify;

pub use callback::{CallbackPayload, CallbackQuery};
pub use config::GatewayConfig;
pub use model::{OrderSummary, PaymentStatusResponse, VerificationResult, VerifyCallbackParams};
pub use orders::{OrderClient, OrderClientError, OrderDirectory};
pub use reconcile::{
    MSG_DECLINED, MSG_MISSING_PARAMS, MSG_VERIFY_FAILED, PaymentLifecycle, PaymentPhase,
    SuccessOutcome, decline_message, reconcile,
};
pub use redirect::RedirectCommand;
pub use request::{OpaqueBlob, PaymentRequest, SUPPORTED_CURRENCIES, ValidationReport, validate};
pub use verify::{VerifyBackend, VerifyClient, VerifyClientError};

use crate::error::PaymentError;

/// Validates an outbound request and builds the browser handoff.
///
/// Reaching this point with invalid data is a contract violation of the
/// checkout flow, surfaced as [`PaymentError::InvalidRequest`] rather
/// than a payment decline.
pub fn prepare_redirect(
    config: &GatewayConfig,
    request: &PaymentRequest,
) -> Result<RedirectCommand, PaymentError> {
    let report = request::validate(request);
    if !report.is_valid {
        return Err(PaymentError::InvalidRequest(report.errors));
    }
    Ok(RedirectCommand::for_request(
        config.checkout_url.clone(),
        request,
    ))
}

/// Runs the inbound half of the handshake for one callback.
///
/// A malformed callback resolves locally and never reaches the backend.
/// The backend is contacted at most once; its verdict, or a transport
/// failure, folds into a terminal phase. No retries.
pub async fn resolve_callback<V, O>(query: CallbackQuery, verify: &V, orders: &O) -> PaymentPhase
where
    V: VerifyBackend,
    O: OrderDirectory,
{
    let payload = match CallbackPayload::from_query(query) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Malformed payment callback: {e}");
            return PaymentPhase::failed(MSG_MISSING_PARAMS);
        }
    };

    let result = match verify.verify_callback(&payload).await {
        Ok(result) => result,
        Err(e) => {
            error!("Callback verification failed: {e}");
            return PaymentPhase::failed(MSG_VERIFY_FAILED);
        }
    };

    reconcile::reconcile(result, orders).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use parking_lot::Mutex;
    use serde_json::json;
    use url::Url;

    fn gateway_config() -> GatewayConfig {
        GatewayConfig {
            checkout_url: Url::parse("https://pay.example.com/checkout").unwrap(),
            backend_url: Url::parse("http://localhost:8080/").unwrap(),
            verify_timeout_secs: 30,
        }
    }

    fn valid_request() -> PaymentRequest {
        PaymentRequest {
            first_name: "Amara".to_string(),
            last_name: "Perera".to_string(),
            email: "amara@example.com".to_string(),
            contact_number: "+94771234567".to_string(),
            address_line_one: "12 Galle Road, Colombo 03".to_string(),
            currency: "LKR".to_string(),
            payment: OpaqueBlob::new("c29sYXIrcGFuZWxzLzQwMHc="),
            secret_key: OpaqueBlob::new("a1b2c3d4-e5f6"),
            process_currency: "LKR".to_string(),
        }
    }

    /// Records every wire body it would have sent to the backend.
    struct RecordingVerify {
        bodies: Mutex<Vec<serde_json::Value>>,
        response: Result<VerificationResult, ()>,
    }

    impl RecordingVerify {
        fn replying(result: VerificationResult) -> Self {
            Self {
                bodies: Mutex::new(Vec::new()),
                response: Ok(result),
            }
        }

        fn failing() -> Self {
            Self {
                bodies: Mutex::new(Vec::new()),
                response: Err(()),
            }
        }
    }

    impl VerifyBackend for RecordingVerify {
        async fn verify_callback(
            &self,
            payload: &CallbackPayload,
        ) -> Result<VerificationResult, VerifyClientError> {
            let body =
                serde_json::to_value(VerifyCallbackParams::from_payload(payload)).unwrap();
            self.bodies.lock().push(body);
            match &self.response {
                Ok(result) => Ok(result.clone()),
                Err(()) => Err(VerifyClientError::HttpStatus {
                    context: "POST /api/payment/verify-callback",
                    status: StatusCode::BAD_GATEWAY,
                    body: String::new(),
                }),
            }
        }
    }

    struct NoOrders;

    impl OrderDirectory for NoOrders {
        async fn fetch_payment_status(
            &self,
            _order_id: &str,
        ) -> Result<PaymentStatusResponse, OrderClientError> {
            Err(OrderClientError::HttpStatus {
                context: "GET /api/orders/{id}/payment-status",
                status: StatusCode::NOT_FOUND,
                body: String::new(),
            })
        }

        async fn fetch_order(&self, _order_id: &str) -> Result<OrderSummary, OrderClientError> {
            Err(OrderClientError::HttpStatus {
                context: "GET /api/orders/{id}",
                status: StatusCode::NOT_FOUND,
                body: String::new(),
            })
        }
    }

    fn confirmed(order_id: &str) -> VerificationResult {
        VerificationResult {
            success: true,
            order_id: order_id.to_string(),
            order_reference_number: None,
            transaction_date_time: None,
            status_code: None,
            comment: None,
            payment_gateway_used: None,
        }
    }

    #[test]
    fn prepare_redirect_rejects_invalid_requests_before_navigation() {
        let mut request = valid_request();
        request.secret_key = OpaqueBlob::new("");
        match prepare_redirect(&gateway_config(), &request) {
            Err(crate::PaymentError::InvalidRequest(errors)) => {
                assert_eq!(errors, vec!["Secret key is required".to_string()]);
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn prepare_redirect_targets_the_configured_checkout_endpoint() {
        let command = prepare_redirect(&gateway_config(), &valid_request()).unwrap();
        assert_eq!(command.endpoint.as_str(), "https://pay.example.com/checkout");
    }

    #[tokio::test]
    async fn complete_callback_is_forwarded_to_the_backend_exactly_once() {
        let verify = RecordingVerify::replying(confirmed("ORD-1"));
        let query = CallbackQuery {
            payment: Some("abc".to_string()),
            signature: Some("xyz".to_string()),
            custom_fields: None,
        };
        let phase = resolve_callback(query, &verify, &NoOrders).await;

        assert!(matches!(phase, PaymentPhase::Succeeded(_)));
        let bodies = verify.bodies.lock();
        assert_eq!(bodies.len(), 1);
        assert_eq!(
            bodies[0],
            json!({"payment": "abc", "signature": "xyz", "custom_fields": null})
        );
    }

    #[tokio::test]
    async fn missing_signature_resolves_locally_without_contacting_the_backend() {
        let verify = RecordingVerify::replying(confirmed("ORD-1"));
        let query = CallbackQuery {
            payment: Some("abc".to_string()),
            signature: None,
            custom_fields: None,
        };
        let phase = resolve_callback(query, &verify, &NoOrders).await;

        assert_eq!(phase, PaymentPhase::failed(MSG_MISSING_PARAMS));
        assert!(verify.bodies.lock().is_empty());
    }

    #[tokio::test]
    async fn backend_transport_failure_resolves_to_failed_without_retry() {
        let verify = RecordingVerify::failing();
        let query = CallbackQuery {
            payment: Some("abc".to_string()),
            signature: Some("xyz".to_string()),
            custom_fields: None,
        };
        let phase = resolve_callback(query, &verify, &NoOrders).await;

        assert_eq!(phase, PaymentPhase::failed(MSG_VERIFY_FAILED));
        assert_eq!(verify.bodies.lock().len(), 1);
    }

    #[tokio::test]
    async fn generic_decline_message_is_used_when_backend_gives_no_detail() {
        let mut declined = confirmed("ORD-1");
        declined.success = false;
        let verify = RecordingVerify::replying(declined);
        let query = CallbackQuery {
            payment: Some("abc".to_string()),
            signature: Some("xyz".to_string()),
            custom_fields: Some("order:1".to_string()),
        };
        let phase = resolve_callback(query, &verify, &NoOrders).await;

        assert_eq!(phase, PaymentPhase::failed(MSG_DECLINED));
        let bodies = verify.bodies.lock();
        assert_eq!(
            bodies[0],
            json!({"payment": "abc", "signature": "xyz", "custom_fields": "order:1"})
        );
    }
}
