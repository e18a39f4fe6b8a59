//! Housing Price API Server
//!
//! REST surface over the frozen artifact bundle: a liveness route and a
//! predict route running the shared encode → align → scale → predict
//! path. The artifact state is loaded once at startup into an explicit
//! `AppState` passed to the handlers; there is no ambient singleton and
//! nothing mutates after load.

use std::sync::Arc;

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use artifact_store::ArtifactState;

mod routes;
mod settings;

pub use settings::ApiSettings;

/// Application state shared across handlers; read-only after startup.
pub struct AppState {
    /// Loaded artifact bundle, or the reason serving is degraded
    pub artifacts: ArtifactState,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create application state from an already-attempted artifact load.
    pub fn new(artifacts: ArtifactState) -> Self {
        Self {
            artifacts,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Liveness response for `GET /`
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub artifacts_ready: bool,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(welcome_handler))
        .route("/health", get(health_handler))
        .route("/predict", post(routes::predict::predict_handler))
        .layer(cors)
        .with_state(state)
}

/// Liveness handler
async fn welcome_handler() -> impl IntoResponse {
    Json(WelcomeResponse {
        message: "Welcome to the Housing Price Prediction API".to_string(),
    })
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: if state.artifacts.is_ready() {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        artifacts_ready: state.artifacts.is_ready(),
    };

    Json(response)
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Run the server
pub async fn run_server(settings: &ApiSettings) -> Result<(), Box<dyn std::error::Error>> {
    let paths = artifact_store::ArtifactPaths::new(&settings.model_dir);
    let state = Arc::new(AppState::new(ArtifactState::load(&paths)));
    if !state.artifacts.is_ready() {
        tracing::warn!(
            "Serving without artifacts; every /predict will fail until a training run writes {}",
            settings.model_dir.display()
        );
    }

    let app = create_router(state);
    let addr = settings.bind_addr();

    info!("Starting API server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
