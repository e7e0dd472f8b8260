//! Axum-based HTTP interface stub. Exposes `POST /api/v1/validate` and
//! `GET /health`. Validation itself is entirely delegated to
//! [`crate::validate_document`] — this module owns request decoding,
//! submission storage, metrics, and response shaping only.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::monitoring::logging::log_validation_outcome;
use crate::monitoring::metrics::SystemMonitor;
use crate::storage::SubmissionStore;

pub struct WebServer {
    config: Arc<AppConfig>,
    store: Arc<dyn SubmissionStore>,
    monitor: Arc<SystemMonitor>,
}

#[derive(Clone)]
struct AppState {
    store: Arc<dyn SubmissionStore>,
    monitor: Arc<SystemMonitor>,
}

impl WebServer {
    pub fn new(config: AppConfig, store: Arc<dyn SubmissionStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            monitor: Arc::new(SystemMonitor::new()),
        }
    }

    pub async fn run(&self, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.create_app();

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

        info!("Starting web server on http://{}", addr);
        info!("Available endpoints:");
        info!("  GET  /health - Health check");
        info!("  POST /api/v1/validate - Validate an EPCIS document");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app.into_make_service()).await?;

        Ok(())
    }

    fn create_app(&self) -> Router<()> {
        let cors_layer = if self.config.server.enable_cors {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            CorsLayer::new()
        };

        let state = AppState {
            store: self.store.clone(),
            monitor: self.monitor.clone(),
        };

        Router::new()
            .route("/health", get(health_handler))
            .nest("/api/v1", Router::new().route("/validate", post(validate_handler)))
            .layer(cors_layer)
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "epcis-validation-engine",
    }))
}

#[derive(Debug, Deserialize)]
struct ValidateParams {
    #[serde(default)]
    format: Option<String>,
    #[serde(default = "default_supplier")]
    supplier: String,
    #[serde(default = "default_name")]
    name: String,
}

fn default_supplier() -> String {
    "unknown".to_string()
}

fn default_name() -> String {
    "submission".to_string()
}

/// `POST /api/v1/validate?format=xml|json&supplier=...&name=...`. The
/// raw request body is the EPCIS document; `format` defaults to a
/// sniff of the body's first non-whitespace byte when omitted.
async fn validate_handler(
    State(state): State<AppState>,
    Query(params): Query<ValidateParams>,
    body: axum::body::Bytes,
) -> Response {
    let is_xml = match params.format.as_deref() {
        Some("xml") => true,
        Some("json") => false,
        _ => body.iter().find(|b| !b.is_ascii_whitespace()) != Some(&b'{'),
    };

    let report = crate::validate_document(&body, is_xml);

    log_validation_outcome(&params.supplier, &params.name, &report);
    state.monitor.record(&report);

    if let Err(err) = state.store.store(&body, &params.name, &params.supplier) {
        tracing::warn!(error = %err, "failed to persist submission");
    }

    Json(report).into_response()
}
