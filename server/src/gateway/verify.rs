//! Client for the trusted backend's callback-verification endpoint.
//!
//! Decryption and signature checking live entirely in the backend; this
//! client forwards the opaque callback values and reports the verdict.

use http::{HeaderMap, StatusCode};
use reqwest::Client;
use std::time::Duration;
use url::Url;

use super::callback::CallbackPayload;
use super::model::{VerificationResult, VerifyCallbackParams};

#[derive(Clone, Debug)]
pub struct VerifyClient {
    /// Base URL of the backend API (e.g. `https://api.shop.example/`)
    #[allow(dead_code)]
    base_url: Url,
    /// Full URL for `POST /api/payment/verify-callback`
    verify_url: Url,
    /// Shared Reqwest HTTP client
    client: Client,
    /// Optional custom headers sent with each request
    headers: HeaderMap,
    /// Optional request timeout
    timeout: Option<Duration>,
}

/// Errors that can occur while talking to the verification backend.
#[derive(Debug, thiserror::Error)]
pub enum VerifyClientError {
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

/// The seam between callback ingestion and the backend. Implemented by
/// [`VerifyClient`] over HTTP and by in-memory doubles in tests.
#[allow(async_fn_in_trait)]
pub trait VerifyBackend {
    async fn verify_callback(
        &self,
        payload: &CallbackPayload,
    ) -> Result<VerificationResult, VerifyClientError>;
}

impl VerifyClient {
    /// Constructs a new [`VerifyClient`] from the backend's base URL.
    pub fn try_new(base_url: Url) -> Result<Self, VerifyClientError> {
        let client = Client::new();
        let verify_url = base_url.join("./api/payment/verify-callback").map_err(|e| {
            VerifyClientError::UrlParse {
                context: "Failed to construct ./api/payment/verify-callback URL",
                source: e,
            }
        })?;
        Ok(Self {
            client,
            base_url,
            verify_url,
            headers: HeaderMap::new(),
            timeout: None,
        })
    }

    /// Attaches custom headers to all future requests.
    pub fn with_headers(&self, headers: HeaderMap) -> Self {
        let mut this = self.clone();
        this.headers = headers;
        this
    }

    /// Sets a timeout for all future requests. A timed-out verification
    /// surfaces as a transport error, never as a success.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let mut this = self.clone();
        this.timeout = Some(timeout);
        this
    }

    /// Generic POST helper that handles JSON serialization, error
    /// mapping and timeout application.
    ///
    /// `context` is a human-readable identifier used in error messages
    /// (e.g. `"POST /api/payment/verify-callback"`).
    async fn post_json<T, R>(
        &self,
        url: &Url,
        context: &'static str,
        payload: &T,
    ) -> Result<R, VerifyClientError>
    where
        T: serde::Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let mut req = self.client.post(url.clone()).json(payload);
        for (key, value) in self.headers.iter() {
            req = req.header(key, value);
        }
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        let http_response = req
            .send()
            .await
            .map_err(|e| VerifyClientError::Http { context, source: e })?;

        if http_response.status().is_success() {
            http_response
                .json::<R>()
                .await
                .map_err(|e| VerifyClientError::JsonDeserialization { context, source: e })
        } else {
            let status = http_response.status();
            let body = http_response
                .text()
                .await
                .map_err(|e| VerifyClientError::ResponseBodyRead { context, source: e })?;
            Err(VerifyClientError::HttpStatus {
                context,
                status,
                body,
            })
        }
    }
}

impl VerifyBackend for VerifyClient {
    /// Sends the raw callback values to `POST /api/payment/verify-callback`.
    async fn verify_callback(
        &self,
        payload: &CallbackPayload,
    ) -> Result<VerificationResult, VerifyClientError> {
        let params = VerifyCallbackParams::from_payload(payload);
        self.post_json(
            &self.verify_url,
            "POST /api/payment/verify-callback",
            &params,
        )
        .await
    }
}
