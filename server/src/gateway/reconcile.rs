//! Resolution of a verified callback into a terminal payment state.

use log::{info, warn};

use super::catalog;
use super::model::{OrderSummary, PaymentStatusResponse, VerificationResult};
use super::orders::OrderDirectory;

pub const MSG_MISSING_PARAMS: &str = "Invalid payment response - missing parameters";
pub const MSG_VERIFY_FAILED: &str = "Failed to verify payment with backend";
pub const MSG_DECLINED: &str = "Payment was declined";

/// Convenience data fetched alongside a confirmed success. Either field
/// may be absent when the best-effort refresh failed.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessOutcome {
    pub result: VerificationResult,
    pub payment_status: Option<PaymentStatusResponse>,
    pub order: Option<OrderSummary>,
}

/// The callback page's state. `Processing` is the only initial state;
/// the other two are terminal within a single callback lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentPhase {
    Processing,
    Succeeded(SuccessOutcome),
    Failed { message: String },
}

impl PaymentPhase {
    pub fn failed(message: impl Into<String>) -> Self {
        PaymentPhase::Failed {
            message: message.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentPhase::Processing)
    }
}

/// Tracks one callback lifecycle. Starts in `Processing` and accepts
/// exactly one transition; anything after the first resolution is a
/// no-op, so a stray late completion cannot rewrite the outcome.
#[derive(Debug)]
pub struct PaymentLifecycle {
    phase: PaymentPhase,
}

impl PaymentLifecycle {
    pub fn new() -> Self {
        Self {
            phase: PaymentPhase::Processing,
        }
    }

    pub fn phase(&self) -> &PaymentPhase {
        &self.phase
    }

    pub fn resolve(&mut self, terminal: PaymentPhase) {
        if !terminal.is_terminal() {
            warn!("Ignoring resolution to a non-terminal phase");
            return;
        }
        if self.phase.is_terminal() {
            warn!("Ignoring second resolution of an already-settled payment");
            return;
        }
        self.phase = terminal;
    }
}

impl Default for PaymentLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns the backend's verdict into a terminal phase.
///
/// A confirmed success is authoritative: the follow-up order refresh is
/// best-effort and its failures are logged, never allowed to downgrade
/// the outcome.
pub async fn reconcile<O: OrderDirectory>(
    result: VerificationResult,
    orders: &O,
) -> PaymentPhase {
    if !result.success {
        let message = decline_message(&result);
        info!(
            "Payment declined for order {}: status_code={:?}",
            result.order_id, result.status_code
        );
        return PaymentPhase::Failed { message };
    }

    info!("Payment confirmed for order {}", result.order_id);

    let payment_status = match orders.fetch_payment_status(&result.order_id).await {
        Ok(status) => Some(status),
        Err(e) => {
            warn!(
                "Best-effort payment-status refresh failed for order {}: {}",
                result.order_id, e
            );
            None
        }
    };
    let order = match orders.fetch_order(&result.order_id).await {
        Ok(order) => Some(order),
        Err(e) => {
            warn!(
                "Best-effort order refresh failed for order {}: {}",
                result.order_id, e
            );
            None
        }
    };

    PaymentPhase::Succeeded(SuccessOutcome {
        result,
        payment_status,
        order,
    })
}

/// Display message for a declined payment: the processor's own comment,
/// else the mapped status message, else a generic decline.
pub fn decline_message(result: &VerificationResult) -> String {
    if let Some(comment) = result.comment.as_deref().filter(|c| !c.is_empty()) {
        return comment.to_string();
    }
    if let Some(status_code) = result.status_code.as_deref().filter(|c| !c.is_empty()) {
        return catalog::status_message(status_code).to_string();
    }
    MSG_DECLINED.to_string()
}
