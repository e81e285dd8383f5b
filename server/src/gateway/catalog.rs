//! Static catalog of processor status and error codes.
//!
//! Pure lookups with no I/O. Unknown codes always classify as failure
//! and map to a generic message; nothing in here panics.

/// Outcome class of a processor transaction status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Approved,
    Declined,
    Failed,
}

impl StatusClass {
    pub fn is_success(self) -> bool {
        matches!(self, StatusClass::Approved)
    }
}

/// Classifies a processor status code. Only `"0"` and `"00"` are
/// success; `"15"` is an explicit decline; everything else, including
/// empty and unrecognised codes, is failure.
pub fn classify_status(status_code: &str) -> StatusClass {
    match status_code {
        "0" | "00" => StatusClass::Approved,
        "15" => StatusClass::Declined,
        _ => StatusClass::Failed,
    }
}

/// Human-readable message for a processor status code.
pub fn status_message(status_code: &str) -> &'static str {
    match status_code {
        "0" | "00" => "Transaction Approved",
        "15" => "Transaction Declined",
        "16" => "Transaction could not be processed",
        "17" => "Transaction cancelled by customer",
        _ => "Unknown payment status",
    }
}

/// Human-readable message for a processor-defined numeric error code.
pub fn error_message(error_code: u32) -> &'static str {
    match error_code {
        10 => "Invalid access credentials",
        21 => "A required field is missing from the payment request",
        22 => "Currency not supported or amount out of range",
        31 => "Transactions from this IP address are blocked",
        32 => "Transactions from this email address are blocked",
        33 => "Merchant account is blocked",
        41 => "No response from the bank, please try again later",
        51 => "Error while processing the transaction",
        61 => "Invalid request URL",
        _ => "Payment gateway returned an unrecognised error",
    }
}
