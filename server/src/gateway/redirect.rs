//! The browser handoff to the processor, modelled as data.
//!
//! Submitting the form navigates the browser away from the site, so the
//! handoff cannot be a return value. [`RedirectCommand`] describes the
//! form; the HTTP layer renders it and the browser executes it.

use url::Url;

use super::request::PaymentRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectCommand {
    pub endpoint: Url,
    /// Form fields in insertion order. Empty values are dropped before
    /// they ever reach the processor.
    pub fields: Vec<(String, String)>,
}

impl RedirectCommand {
    /// Builds the handoff form for an already-validated request.
    ///
    /// Callers run [`super::request::validate`] first; this constructor
    /// only assembles, it does not re-check.
    pub fn for_request(endpoint: Url, request: &PaymentRequest) -> Self {
        let mut fields = Vec::new();
        push_field(&mut fields, "first_name", &request.first_name);
        push_field(&mut fields, "last_name", &request.last_name);
        push_field(&mut fields, "email", &request.email);
        push_field(&mut fields, "contact_number", &request.contact_number);
        push_field(&mut fields, "address_line_one", &request.address_line_one);
        push_field(&mut fields, "currency", &request.currency);
        push_field(&mut fields, "payment", request.payment.expose());
        push_field(&mut fields, "secret_key", request.secret_key.expose());
        push_field(&mut fields, "process_currency", &request.process_currency);
        Self { endpoint, fields }
    }

    /// Renders the self-submitting handoff page.
    ///
    /// The form posts as `multipart/form-data`: the encrypted payload is
    /// base64-style text whose `+`, `/` and `=` characters do not survive
    /// an `application/x-www-form-urlencoded` body.
    pub fn render_html(&self) -> String {
        let mut inputs = String::new();
        for (name, value) in &self.fields {
            inputs.push_str(&format!(
                "<input type=\"hidden\" name=\"{}\" value=\"{}\"/>\n",
                escape_html(name),
                escape_html(value)
            ));
        }
        format!(
            "<!DOCTYPE html>\n\
             <html>\n\
             <head><meta charset=\"utf-8\"><title>Redirecting to payment</title></head>\n\
             <body onload=\"document.getElementById('gateway-handoff').submit()\">\n\
             <p>Redirecting you to the payment gateway&hellip;</p>\n\
             <form id=\"gateway-handoff\" method=\"post\" action=\"{}\" enctype=\"multipart/form-data\">\n\
             {}<noscript><button type=\"submit\">Continue to payment</button></noscript>\n\
             </form>\n\
             </body>\n\
             </html>\n",
            escape_html(self.endpoint.as_str()),
            inputs
        )
    }
}

fn push_field(fields: &mut Vec<(String, String)>, name: &str, value: &str) {
    if !value.is_empty() {
        fields.push((name.to_string(), value.to_string()));
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::request::OpaqueBlob;

    fn endpoint() -> Url {
        Url::parse("https://pay.example.com/checkout").unwrap()
    }

    fn request() -> PaymentRequest {
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

    #[test]
    fn empty_fields_are_dropped_from_the_form() {
        let mut request = request();
        request.currency = String::new();
        let command = RedirectCommand::for_request(endpoint(), &request);
        assert!(command.fields.iter().all(|(name, _)| name != "currency"));
        assert_eq!(command.fields.len(), 8);
    }

    #[test]
    fn encrypted_payload_is_forwarded_byte_for_byte() {
        let command = RedirectCommand::for_request(endpoint(), &request());
        let payment = command
            .fields
            .iter()
            .find(|(name, _)| name == "payment")
            .map(|(_, value)| value.as_str());
        assert_eq!(payment, Some("c29sYXIrcGFuZWxzLzQwMHc="));
    }

    #[test]
    fn rendered_form_posts_multipart_to_the_endpoint() {
        let html = RedirectCommand::for_request(endpoint(), &request()).render_html();
        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(html.contains("method=\"post\""));
        assert!(html.contains("action=\"https://pay.example.com/checkout\""));
        assert!(html.contains("document.getElementById('gateway-handoff').submit()"));
    }

    #[test]
    fn field_values_are_html_escaped() {
        let mut request = request();
        request.address_line_one = "12 \"Galle\" Road <Colombo>".to_string();
        let html = RedirectCommand::for_request(endpoint(), &request).render_html();
        assert!(html.contains("12 &quot;Galle&quot; Road &lt;Colombo&gt;"));
        assert!(!html.contains("<Colombo>"));
    }
}
