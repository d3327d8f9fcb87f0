//! HTTP gateway: one axum router serving every storefront route.

pub mod error;
pub mod handlers;
pub mod openapi;
pub mod state;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{AppConfig, GatewayConfig};
use crate::{catalog, directory, media, payment};
pub use error::{ApiError, ApiJson, ApiResult, ErrorKind};
pub use state::AppState;

fn cors_layer(config: &GatewayConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    if config.cors_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("[gateway] Ignoring invalid CORS origin {:?}", o);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Build the complete router around `state`.
pub fn router(state: Arc<AppState>, config: &AppConfig) -> Router {
    // Multipart bodies are buffered whole; cap them separately from JSON
    let media_routes = Router::new()
        .route("/upload-image", post(media::handlers::upload_image))
        .route("/upload-file", post(media::handlers::upload_file))
        .layer(DefaultBodyLimit::max(config.media.max_upload_bytes));

    let api_routes = Router::new()
        .route(
            "/products",
            get(catalog::handlers::list_products).post(catalog::handlers::create_product),
        )
        .route(
            "/products/{id}",
            get(catalog::handlers::get_product)
                .put(catalog::handlers::update_product)
                .delete(catalog::handlers::delete_product),
        )
        .route("/users", get(directory::handlers::list_users))
        .merge(media_routes);

    Router::new()
        .route("/health", get(handlers::health_check))
        // Payments
        .route("/order", post(payment::handlers::create_order))
        .route("/verify", post(payment::handlers::verify_payment))
        .nest("/api", api_routes)
        .with_state(state)
        // Stateless, added after with_state
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.gateway))
}

/// Bind and serve until the process is stopped.
pub async fn run_server(config: &AppConfig, state: Arc<AppState>, port: u16) -> anyhow::Result<()> {
    let app = router(state, config);

    let addr = format!("{}:{}", config.gateway.host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", addr, e))?;

    info!("[gateway] Listening on http://{}", addr);
    info!("[gateway] API docs: http://{}/docs", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, header};
    use tower::ServiceExt;

    async fn preflight(config: &GatewayConfig, origin: &str) -> Option<HeaderValue> {
        let app = Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(cors_layer(config));
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/ping")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .cloned()
    }

    #[tokio::test]
    async fn test_cors_wildcard_allows_any_origin() {
        let config = GatewayConfig {
            cors_origins: vec!["*".to_string()],
            ..GatewayConfig::default()
        };

        let allowed = preflight(&config, "https://anywhere.example.com").await;
        assert_eq!(allowed.unwrap(), "*");
    }

    #[tokio::test]
    async fn test_cors_skips_invalid_origin_entries() {
        let config = GatewayConfig {
            cors_origins: vec!["bad\norigin".to_string(), "http://localhost:5173".to_string()],
            ..GatewayConfig::default()
        };

        let allowed = preflight(&config, "http://localhost:5173").await;
        assert_eq!(allowed.unwrap(), "http://localhost:5173");
        assert!(preflight(&config, "https://evil.example.com").await.is_none());
    }
}
