mod http;

use env_logger::Env;
use http::Config;
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use suncart::gateway::{OrderClient, VerifyClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_level.as_str()))
        .init();

    let verify = VerifyClient::try_new(config.gateway.backend_url.clone())?
        .with_timeout(Duration::from_secs(config.gateway.verify_timeout_secs));
    let orders = OrderClient::try_new(config.gateway.backend_url.clone())?;
    let state = http::router::AppState {
        config: config.clone(),
        verify: Arc::new(verify),
        orders: Arc::new(orders),
        in_flight: Arc::new(Default::default()),
    };
    let app = http::router::build_router(state);

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server listening on {}", addr);
    info!(
        "Gateway checkout endpoint: {}",
        config.gateway.checkout_url
    );
    info!(
        "Verification backend: {}",
        config.gateway.backend_url
    );

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
