use envconfig::Envconfig;
use url::Url;

#[derive(Envconfig, Debug, Clone)]
pub struct GatewayConfig {
    /// The processor's hosted checkout endpoint the browser posts to.
    #[envconfig(
        from = "GATEWAY_CHECKOUT_URL",
        default = "https://pay.example.com/checkout"
    )]
    pub checkout_url: Url,

    /// Base URL of the trusted backend that decrypts and verifies
    /// callbacks and owns order data.
    #[envconfig(from = "GATEWAY_BACKEND_URL", default = "http://localhost:8080/")]
    pub backend_url: Url,

    /// Timeout for the verification call. A hung backend resolves to a
    /// failed payment instead of an unbounded processing state.
    #[envconfig(from = "GATEWAY_VERIFY_TIMEOUT_SECS", default = "30")]
    pub verify_timeout_secs: u64,
}
