pub mod request_id;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::controllers::{
    health,
    recognition::{RecognitionController, WhisperController},
    tts::TtsController,
};
use crate::infrastructure::config::Config;

pub use request_id::{request_id_middleware, X_REQUEST_ID};

/// Controllers mounted by the router
pub struct Controllers {
    pub tts: Arc<TtsController>,
    pub recognition: Arc<RecognitionController>,
    /// Google recognition, mounted only when service-account credentials are configured
    pub google: Option<Arc<RecognitionController>>,
    /// Mounted only when an OpenAI key is configured
    pub whisper: Option<Arc<WhisperController>>,
}

/// Build the application router with all routes configured
pub fn build_router(sounds_dir: Arc<PathBuf>, controllers: Controllers) -> Router {
    let tts_routes = Router::new()
        .route("/synthesize", post(TtsController::synthesize))
        .route("/voicelist", get(TtsController::voice_list))
        .with_state(controllers.tts);

    let recognition_routes = Router::new()
        .route("/recognize", post(RecognitionController::recognize))
        .with_state(controllers.recognition);

    let mut app = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(sounds_dir)
        .merge(tts_routes)
        .merge(recognition_routes);

    if let Some(google) = controllers.google {
        let google_routes = Router::new()
            .route("/recognize/google", post(RecognitionController::recognize))
            .with_state(google);
        app = app.merge(google_routes);
    }

    if let Some(whisper) = controllers.whisper {
        let whisper_routes = Router::new()
            .route("/recognize/whisper", post(WhisperController::recognize))
            .with_state(whisper);
        app = app.merge(whisper_routes);
    }

    app.layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    controllers: Controllers,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(Arc::new(config.sounds_dir.clone()), controllers);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
