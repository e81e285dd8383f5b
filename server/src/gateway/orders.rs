//! Client for the order subsystem.
//!
//! Consulted only after the backend has confirmed a payment, and only
//! best-effort: a failed refresh is logged by the caller, never treated
//! as a payment failure.

use http::StatusCode;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use super::model::{OrderSummary, PaymentStatusResponse};

#[derive(Clone, Debug)]
pub struct OrderClient {
    base_url: Url,
    client: Client,
    timeout: Option<Duration>,
}

#[derive(Debug, thiserror::Error)]
pub enum OrderClientError {
    #[error("URL parse error: {context}: {source}")]
    UrlParse {
        context: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("HTTP error: {context}: {source}")]
    Http {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to deserialize JSON: {context}: {source}")]
    JsonDeserialization {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("Unexpected HTTP status {status}: {context}: {body}")]
    HttpStatus {
        context: &'static str,
        status: StatusCode,
        body: String,
    },
    #[error("Failed to read response body as text: {context}: {source}")]
    ResponseBodyRead {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// The seam between the reconciler and the order subsystem.
#[allow(async_fn_in_trait)]
pub trait OrderDirectory {
    async fn fetch_payment_status(
        &self,
        order_id: &str,
    ) -> Result<PaymentStatusResponse, OrderClientError>;

    async fn fetch_order(&self, order_id: &str) -> Result<OrderSummary, OrderClientError>;
}

impl OrderClient {
    pub fn try_new(base_url: Url) -> Result<Self, OrderClientError> {
        Ok(Self {
            base_url,
            client: Client::new(),
            timeout: None,
        })
    }

    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let mut this = self.clone();
        this.timeout = Some(timeout);
        this
    }

    async fn get_json<R>(&self, url: Url, context: &'static str) -> Result<R, OrderClientError>
    where
        R: serde::de::DeserializeOwned,
    {
        let mut req = self.client.get(url);
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        let http_response = req
            .send()
            .await
            .map_err(|e| OrderClientError::Http { context, source: e })?;

        if http_response.status().is_success() {
            http_response
                .json::<R>()
                .await
                .map_err(|e| OrderClientError::JsonDeserialization { context, source: e })
        } else {
            let status = http_response.status();
            let body = http_response
                .text()
                .await
                .map_err(|e| OrderClientError::ResponseBodyRead { context, source: e })?;
            Err(OrderClientError::HttpStatus {
                context,
                status,
                body,
            })
        }
    }
}

impl OrderDirectory for OrderClient {
    async fn fetch_payment_status(
        &self,
        order_id: &str,
    ) -> Result<PaymentStatusResponse, OrderClientError> {
        let url = self
            .base_url
            .join(&format!("./api/orders/{order_id}/payment-status"))
            .map_err(|e| OrderClientError::UrlParse {
                context: "Failed to construct payment-status URL",
                source: e,
            })?;
        self.get_json(url, "GET /api/orders/{id}/payment-status")
            .await
    }

    async fn fetch_order(&self, order_id: &str) -> Result<OrderSummary, OrderClientError> {
        let url = self
            .base_url
            .join(&format!("./api/orders/{order_id}"))
            .map_err(|e| OrderClientError::UrlParse {
                context: "Failed to construct order URL",
                source: e,
            })?;
        self.get_json(url, "GET /api/orders/{id}").await
    }
}
