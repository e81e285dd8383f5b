use axum::{
    Json, Router,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use log::{error, warn};
use std::sync::Arc;
use suncart::PaymentError;
use suncart::gateway::{
    self, CallbackQuery, OrderClient, PaymentLifecycle, PaymentPhase, PaymentRequest, VerifyClient,
};
use tower_http::cors::CorsLayer;

use super::callback::{self, InFlightCallbacks};
use super::config::Config;
use super::model::ValidationErrorResponse;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub verify: Arc<VerifyClient>,
    pub orders: Arc<OrderClient>,
    pub in_flight: Arc<InFlightCallbacks>,
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<VerifyClient> {
    fn from_ref(state: &AppState) -> Self {
        state.verify.clone()
    }
}

impl FromRef<AppState> for Arc<OrderClient> {
    fn from_ref(state: &AppState) -> Self {
        state.orders.clone()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/checkout/redirect", post(handle_checkout_redirect))
        .route("/payment/callback", get(handle_payment_callback))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn handle_health() -> impl IntoResponse {
    StatusCode::OK
}

/// Validates the assembled payment request and returns the
/// self-submitting handoff page. The browser leaves the site when it
/// loads; nothing after this observes the processor's response.
async fn handle_checkout_redirect(
    State(state): State<AppState>,
    Json(request): Json<PaymentRequest>,
) -> Response {
    match gateway::prepare_redirect(&state.config.gateway, &request) {
        Ok(command) => Html(command.render_html()).into_response(),
        Err(PaymentError::InvalidRequest(errors)) => {
            // Contract violation of the checkout flow, not a decline.
            error!(
                "Checkout reached the redirect step with invalid data: {}",
                errors.join("; ")
            );
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationErrorResponse { errors }),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to prepare redirect: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to prepare redirect",
            )
                .into_response()
        }
    }
}

/// The processor's return URL. Runs the ingest/verify/reconcile
/// pipeline once per callback and renders the terminal state.
async fn handle_payment_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    // Guard by signature; a callback without one resolves locally
    // below and never contacts the backend.
    let _guard = match query.signature.as_deref().filter(|s| !s.is_empty()) {
        Some(signature) => match InFlightCallbacks::try_begin(&state.in_flight, signature) {
            Some(guard) => Some(guard),
            None => {
                warn!("Duplicate callback while verification is still in flight");
                let (_, body) = callback::resolution_response(PaymentPhase::Processing);
                return (StatusCode::CONFLICT, Json(body)).into_response();
            }
        },
        None => None,
    };

    let mut lifecycle = PaymentLifecycle::new();
    let phase =
        gateway::resolve_callback(query, state.verify.as_ref(), state.orders.as_ref()).await;
    lifecycle.resolve(phase);

    let (status, body) = callback::resolution_response(lifecycle.phase().clone());
    (status, Json(body)).into_response()
}
