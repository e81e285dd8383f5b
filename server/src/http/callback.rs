//! Callback-page plumbing: the in-flight guard and the mapping from a
//! resolved payment phase to the response body.

use std::collections::HashSet;
use std::sync::Arc;

use http::StatusCode;
use parking_lot::Mutex;
use suncart::gateway::PaymentPhase;

use super::model::PaymentResolutionResponse;

/// Callback signatures currently being verified. A duplicate return
/// navigation for the same signature does not fan out into a second
/// verification call while the first is still in flight.
pub struct InFlightCallbacks {
    inner: Mutex<HashSet<String>>,
}

impl InFlightCallbacks {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashSet::new()),
        }
    }

    pub fn try_begin(registry: &Arc<Self>, key: &str) -> Option<InFlightGuard> {
        let mut inner = registry.inner.lock();
        if !inner.insert(key.to_string()) {
            return None;
        }
        Some(InFlightGuard {
            registry: Arc::clone(registry),
            key: key.to_string(),
        })
    }
}

impl Default for InFlightCallbacks {
    fn default() -> Self {
        Self::new()
    }
}

pub struct InFlightGuard {
    registry: Arc<InFlightCallbacks>,
    key: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry.inner.lock().remove(&self.key);
    }
}

pub fn resolution_response(phase: PaymentPhase) -> (StatusCode, PaymentResolutionResponse) {
    match phase {
        PaymentPhase::Processing => (
            StatusCode::ACCEPTED,
            PaymentResolutionResponse {
                status: "processing",
                order_id: None,
                order_reference_number: None,
                transaction_date_time: None,
                payment_gateway_used: None,
                message: None,
                payment_status: None,
                order: None,
                retry_checkout: false,
            },
        ),
        PaymentPhase::Succeeded(outcome) => (
            StatusCode::OK,
            PaymentResolutionResponse {
                status: "succeeded",
                order_id: Some(outcome.result.order_id),
                order_reference_number: outcome.result.order_reference_number,
                transaction_date_time: outcome.result.transaction_date_time,
                payment_gateway_used: outcome.result.payment_gateway_used,
                message: None,
                payment_status: outcome.payment_status,
                order: outcome.order,
                retry_checkout: false,
            },
        ),
        PaymentPhase::Failed { message } => (
            StatusCode::OK,
            PaymentResolutionResponse {
                status: "failed",
                order_id: None,
                order_reference_number: None,
                transaction_date_time: None,
                payment_gateway_used: None,
                message: Some(message),
                payment_status: None,
                order: None,
                retry_checkout: true,
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use suncart::gateway::{SuccessOutcome, VerificationResult};

    #[test]
    fn only_one_guard_exists_per_signature_at_a_time() {
        let registry = Arc::new(InFlightCallbacks::new());
        let guard = InFlightCallbacks::try_begin(&registry, "sig-1");
        assert!(guard.is_some());
        assert!(InFlightCallbacks::try_begin(&registry, "sig-1").is_none());
        assert!(InFlightCallbacks::try_begin(&registry, "sig-2").is_some());

        drop(guard);
        assert!(InFlightCallbacks::try_begin(&registry, "sig-1").is_some());
    }

    #[test]
    fn failed_phase_offers_a_fresh_checkout() {
        let (status, body) = resolution_response(PaymentPhase::failed("Payment was declined"));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "failed");
        assert_eq!(body.message.as_deref(), Some("Payment was declined"));
        assert!(body.retry_checkout);
    }

    #[test]
    fn succeeded_phase_carries_the_backend_confirmation() {
        let outcome = SuccessOutcome {
            result: VerificationResult {
                success: true,
                order_id: "ORD-1".to_string(),
                order_reference_number: Some("REF-9".to_string()),
                transaction_date_time: None,
                status_code: Some("00".to_string()),
                comment: None,
                payment_gateway_used: Some("visa".to_string()),
            },
            payment_status: None,
            order: None,
        };
        let (status, body) = resolution_response(PaymentPhase::Succeeded(outcome));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "succeeded");
        assert_eq!(body.order_id.as_deref(), Some("ORD-1"));
        assert_eq!(body.order_reference_number.as_deref(), Some("REF-9"));
        assert!(!body.retry_checkout);
    }
}
