use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use speech_gateway::controllers::recognition::{RecognitionController, WhisperController};
use speech_gateway::controllers::tts::TtsController;
use speech_gateway::domain::recognition::{CorrectionProfiles, RecognitionService, WhisperService};
use speech_gateway::domain::tts::TtsService;
use speech_gateway::infrastructure::audio::SoxConverter;
use speech_gateway::infrastructure::config::{Config, LogFormat};
use speech_gateway::infrastructure::http::{start_http_server, Controllers};
use speech_gateway::infrastructure::repositories::{
    AzureSpeechRepository, AzureTtsRepository, GoogleSpeechRepository, OpenAiTranscriptionRepository,
    ServiceAccountKey,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing required configuration aborts before anything is served
    let config = Config::from_env()?;

    init_logging(&config);

    tracing::info!(
        "Starting Speech Gateway on {}:{}",
        config.host,
        config.port
    );
    tracing::info!(
        sounds_dir = %config.sounds_dir.display(),
        default_voice = %config.default_voice,
        conversion_workers = config.conversion_workers,
        development = config.is_development(),
        whisper = config.whisper_enabled(),
        google = config.google_enabled(),
        "Configuration loaded"
    );

    // Converter availability is only reported; conversions fail per request
    let converter = Arc::new(SoxConverter::new(config.sox_path.clone()));
    let sox = converter.clone();
    match tokio::task::spawn_blocking(move || sox.version()).await? {
        Some(version) => tracing::info!(version = %version, "sox converter available"),
        None => tracing::warn!(sox_path = %config.sox_path, "sox converter not found, conversions will fail"),
    }

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories (provider clients)
    tracing::info!("Instantiating repositories...");
    let tts_repo = Arc::new(AzureTtsRepository::new(
        config.azure_tts_base_url.clone(),
        config.azure_api_token.clone(),
    ));
    let speech_repo = Arc::new(AzureSpeechRepository::new(
        &config.azure_region,
        config.azure_api_token.clone(),
    ));

    // 2. Instantiate services
    tracing::info!("Instantiating services...");
    let tts_service = Arc::new(TtsService::new(
        tts_repo,
        converter,
        config.sounds_dir.clone(),
        config.conversion_workers,
    ));
    let recognition_service = Arc::new(RecognitionService::new(
        speech_repo,
        config.sounds_dir.clone(),
        config.default_recognition_language.clone(),
    ));
    let google_service = match &config.google_credentials_path {
        Some(path) => {
            let credentials = ServiceAccountKey::load(path)
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
            let google_repo =
                Arc::new(GoogleSpeechRepository::new(credentials).map_err(|e| anyhow::anyhow!(e))?);
            Some(Arc::new(RecognitionService::new(
                google_repo,
                config.sounds_dir.clone(),
                config.default_google_recognition_language.clone(),
            )))
        }
        None => {
            tracing::warn!("GOOGLE_CLOUD_SPEECH_CREDENTIALS not set, google recognition disabled");
            None
        }
    };
    let whisper_service = match &config.openai_api_key {
        Some(api_key) => {
            let client = async_openai::Client::with_config(
                async_openai::config::OpenAIConfig::new().with_api_key(api_key.clone()),
            );
            let transcription_repo = Arc::new(OpenAiTranscriptionRepository::new(Arc::new(client)));
            Some(Arc::new(WhisperService::new(
                transcription_repo,
                config.sounds_dir.clone(),
                CorrectionProfiles::new(
                    config.date_parser_model.clone(),
                    config.user_correspond_model.clone(),
                ),
            )))
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set, whisper recognition disabled");
            None
        }
    };

    // 3. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let controllers = Controllers {
        tts: Arc::new(TtsController::new(tts_service, config.default_voice.clone())),
        recognition: Arc::new(RecognitionController::new(recognition_service)),
        google: google_service.map(|service| Arc::new(RecognitionController::new(service))),
        whisper: whisper_service.map(|service| Arc::new(WhisperController::new(service))),
    };

    start_http_server(config, controllers)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "speech_gateway=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "speech_gateway=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
