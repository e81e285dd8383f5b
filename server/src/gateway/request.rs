//! Outbound payment request and its pre-handoff validation.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

pub const SUPPORTED_CURRENCIES: [&str; 4] = ["LKR", "USD", "GBP", "AUD"];

const NAME_MAX_CHARS: usize = 30;
const CONTACT_MIN_CHARS: usize = 9;
const CONTACT_MAX_CHARS: usize = 20;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?i)[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$",
    )
    .expect("email regex is valid")
});

static CONTACT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9]+$").expect("contact regex is valid")
});

/// A string whose contents are meaningful only to the backend or the
/// processor. Never parsed, never logged in full.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct OpaqueBlob(String);

impl OpaqueBlob {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Hands out the raw value for byte-for-byte forwarding.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OpaqueBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OpaqueBlob(*** redacted ***)")
    }
}

/// The payload handed off to the processor. The `payment` blob and
/// `secret_key` come straight from the backend's order-creation
/// response and are forwarded unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_number: String,
    pub address_line_one: String,
    pub currency: String,
    pub payment: OpaqueBlob,
    pub secret_key: OpaqueBlob,
    pub process_currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Checks a [`PaymentRequest`] before the browser is handed off.
///
/// Rules run in a fixed order and each failing rule contributes exactly
/// one error, so callers can assert exact error sets. Opaque fields are
/// checked for presence only.
pub fn validate(request: &PaymentRequest) -> ValidationReport {
    let mut errors = Vec::new();

    validate_name(&request.first_name, "First name", &mut errors);
    validate_name(&request.last_name, "Last name", &mut errors);

    if request.email.is_empty() || !EMAIL_REGEX.is_match(&request.email) {
        errors.push("A valid email address is required".to_string());
    }

    let contact_len = request.contact_number.chars().count();
    if !(CONTACT_MIN_CHARS..=CONTACT_MAX_CHARS).contains(&contact_len)
        || !CONTACT_REGEX.is_match(&request.contact_number)
    {
        errors.push(
            "Contact number must be 9 to 20 characters, digits with an optional leading +"
                .to_string(),
        );
    }

    if request.address_line_one.is_empty() {
        errors.push("Address line 1 is required".to_string());
    }

    if request.secret_key.is_empty() {
        errors.push("Secret key is required".to_string());
    }

    if request.payment.is_empty() {
        errors.push("Encrypted payment payload is required".to_string());
    }

    if !SUPPORTED_CURRENCIES.contains(&request.process_currency.as_str()) {
        errors.push("Process currency must be one of LKR, USD, GBP, AUD".to_string());
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

fn validate_name(value: &str, field: &str, errors: &mut Vec<String>) {
    if value.is_empty() {
        errors.push(format!("{field} is required"));
    } else if value.chars().count() > NAME_MAX_CHARS {
        errors.push(format!("{field} must be 30 characters or fewer"));
    }
}
