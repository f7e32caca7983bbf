//! HTTP server for the widget endpoints
//!
//! Provides /health, /googleplus/{type}, and the client loader asset.

use crate::render::{WidgetKind, WidgetRenderer};
use crate::types::HealthResponse;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// The client-side loader shipped with the widgets.
const LOADER_JS: &str = include_str!("../assets/loader.js");

/// Shared state for the HTTP server
pub struct ServerState {
    pub renderer: WidgetRenderer,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(renderer: WidgetRenderer) -> Self {
        Self {
            renderer,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/googleplus/{type}", get(render_widget))
        .route("/googleplus/assets/loader.js", get(loader_js))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: SharedState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime_secs = (Utc::now() - state.started_at).num_seconds() as u64;
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        cached_widgets: state.renderer.cache().len().await,
    })
}

/// Render a widget for the deferred-load follow-up request (also usable
/// directly by anything that wants the bare fragment).
async fn render_widget(
    State(state): State<SharedState>,
    Path(widget_type): Path<String>,
) -> Response {
    let Some(kind) = WidgetKind::from_path(&widget_type) else {
        return (StatusCode::NOT_FOUND, "unknown widget type").into_response();
    };

    match state.renderer.render(kind).await {
        Ok(html) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
            .header(header::CACHE_CONTROL, "s-maxage=180, public")
            .body(Body::from(html))
            .unwrap(),
        Err(e) => {
            error!(widget = %widget_type, error = %e, "Failed to render widget");
            (StatusCode::BAD_GATEWAY, "widget render failed").into_response()
        }
    }
}

/// Serve the deferred-widget loader script
async fn loader_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        LOADER_JS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidgetConfig;
    use crate::templates::BuiltinTemplates;
    use axum::http::Request;
    use tempfile::tempdir;
    use tower::ServiceExt;

    fn state_with(config: WidgetConfig, files_root: &std::path::Path) -> SharedState {
        let renderer =
            WidgetRenderer::new(config, files_root.to_path_buf(), Arc::new(BuiltinTemplates))
                .unwrap();
        Arc::new(ServerState::new(renderer))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let dir = tempdir().unwrap();
        let router = create_router(state_with(WidgetConfig::default(), dir.path()));

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert!(json["uptime_secs"].as_u64().is_some());
        assert_eq!(json["cached_widgets"], 0);
    }

    #[tokio::test]
    async fn test_unknown_widget_type_is_not_found() {
        let dir = tempdir().unwrap();
        let router = create_router(state_with(WidgetConfig::default(), dir.path()));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/googleplus/circles")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_widget_endpoint_renders_html_with_cache_control() {
        // No developer key configured: the response is still a 200 with
        // the setup notice rendered into the widget
        let dir = tempdir().unwrap();
        let router = create_router(state_with(WidgetConfig::default(), dir.path()));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/googleplus/profile")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "s-maxage=180, public"
        );
        assert!(response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("developer key"));
    }

    #[tokio::test]
    async fn test_loader_script_is_served() {
        let dir = tempdir().unwrap();
        let router = create_router(state_with(WidgetConfig::default(), dir.path()));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/googleplus/assets/loader.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("application/javascript"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let script = String::from_utf8(body.to_vec()).unwrap();
        assert!(script.contains("data-defer"));
        assert!(script.contains("/googleplus/"));
    }
}
