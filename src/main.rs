//! Storefront Gateway
//!
//! ```text
//!                ┌────────────┐   ┌──────────────────────────┐
//!  HTTP ────────▶│  Gateway   │──▶│ Razorpay  (orders)       │
//!                │  (axum)    │──▶│ Firestore (products)     │
//!                │            │──▶│ Identity  (users)        │
//!                │            │──▶│ Cloudinary / Uploadcare  │
//!                └────────────┘   └──────────────────────────┘
//! ```
//!
//! Usage: `storefront_gateway [--env dev] [--port 10000]`

use std::sync::Arc;

use storefront_gateway::config::{AppConfig, Credentials, env_keys};
use storefront_gateway::gateway::{self, AppState};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() {
    let env = get_env();
    let app_config = match AppConfig::load(&env) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: {}", e);
            std::process::exit(1);
        }
    };
    let _log_guard = storefront_gateway::logging::init_logging(&app_config);

    tracing::info!(
        "Starting storefront gateway v{} in {} mode",
        env!("CARGO_PKG_VERSION"),
        env
    );

    // Credentials are required before any route is served
    let credentials = match Credentials::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("FATAL: {}", e);
            std::process::exit(1);
        }
    };

    let http = match reqwest::Client::builder()
        .user_agent(concat!("storefront_gateway/", env!("CARGO_PKG_VERSION")))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("FATAL: failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let state = match AppState::from_config(&app_config, &credentials, http) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!("FATAL: {}", e);
            std::process::exit(1);
        }
    };

    let env_port = std::env::var(env_keys::PORT).ok();
    let port = app_config
        .gateway
        .resolve_port(get_port_override(), env_port.as_deref());

    if let Err(e) = gateway::run_server(&app_config, state, port).await {
        tracing::error!("FATAL: {}", e);
        std::process::exit(1);
    }
}
