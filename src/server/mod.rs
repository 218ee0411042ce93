//! HTTP API for the crawl service
//!
//! Routes:
//! - `GET /api/urls` - list records
//! - `POST /api/urls` - crawl and store a URL
//! - `POST /api/urls/:id/recrawl` - crawl a stored URL again
//! - `DELETE /api/urls/:id` - delete one record
//! - `DELETE /api/urls` - delete every record
//! - `GET /healthz` - liveness

mod routes;

pub use routes::{ApiError, CrawlRequest, CrawlResponse, MessageResponse};

use crate::config::Config;
use crate::service::CrawlService;
use crate::PageMetaError;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: CrawlService,
}

/// Builds the API router around a service
pub fn router(service: CrawlService) -> Router {
    let state = AppState { service };

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route(
            "/api/urls",
            get(routes::list_urls)
                .post(routes::create_url)
                .delete(routes::delete_all_urls),
        )
        .route("/api/urls/:id", axum::routing::delete(routes::delete_url))
        .route("/api/urls/:id/recrawl", post(routes::recrawl_url))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API until Ctrl-C
///
/// In-flight crawls are cancelled on shutdown.
pub async fn serve(config: &Config) -> Result<(), PageMetaError> {
    let addr: SocketAddr = config.server.bind_addr.parse().map_err(|e| {
        crate::ConfigError::Validation(format!("Invalid bind-addr '{}': {}", config.server.bind_addr, e))
    })?;

    let service = CrawlService::from_config(config)?;
    let shutdown = service.shutdown_token();
    let app = router(service);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
            shutdown.cancel();
        })
        .await?;

    Ok(())
}
