use serde::Deserialize;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_AZURE_TTS_BASE_URL: &str = "https://eastus.tts.speech.microsoft.com/cognitiveservices";
pub const DEFAULT_DATE_PARSER_MODEL: &str = "ft:gpt-3.5-turbo-0613:personal::80yeg8Ta";
pub const DEFAULT_USER_CORRESPOND_MODEL: &str = "ft:gpt-3.5-turbo-0613:personal::83QYn3GH";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Storage
    pub sounds_dir: PathBuf,
    // Azure speech services
    pub azure_api_token: String,
    pub azure_tts_base_url: String,
    pub azure_region: String,
    pub default_voice: String,
    pub default_recognition_language: String,
    // Google speech (recognition only)
    pub google_credentials_path: Option<PathBuf>,
    pub default_google_recognition_language: String,
    // Format conversion
    pub sox_path: String,
    pub conversion_workers: usize,
    // OpenAI (whisper + transcript correction)
    pub openai_api_key: Option<String>,
    pub date_parser_model: String,
    pub user_correspond_model: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", "8080")?,
            environment: match optional("ENVIRONMENT").as_deref() {
                Some("production") => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match optional("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            sounds_dir: PathBuf::from(env::var("SOUNDS_DIR").unwrap_or_else(|_| "/sounds".to_string())),
            azure_api_token: optional("AZURE_API_TOKEN").ok_or(ConfigError::Missing("AZURE_API_TOKEN"))?,
            azure_tts_base_url: env::var("AZURE_TTS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_AZURE_TTS_BASE_URL.to_string()),
            azure_region: env::var("API_REGION").unwrap_or_else(|_| "eastus".to_string()),
            default_voice: env::var("DEFAULT_LANG").unwrap_or_else(|_| "es-MX-JorgeNeural".to_string()),
            default_recognition_language: env::var("DEFAULT_RECOGNITION_LANG")
                .unwrap_or_else(|_| "es-MX".to_string()),
            google_credentials_path: optional("GOOGLE_CLOUD_SPEECH_CREDENTIALS").map(PathBuf::from),
            default_google_recognition_language: env::var("DEFAULT_GOOGLE_RECOGNITION_LANG")
                .unwrap_or_else(|_| "es-CO".to_string()),
            sox_path: env::var("SOX_PATH").unwrap_or_else(|_| "sox".to_string()),
            conversion_workers: parse_var("CONVERSION_WORKERS", "4")?,
            openai_api_key: optional("OPENAI_API_KEY"),
            date_parser_model: env::var("WHISPER_DATE_PARSER_MODEL")
                .unwrap_or_else(|_| DEFAULT_DATE_PARSER_MODEL.to_string()),
            user_correspond_model: env::var("WHISPER_USER_CORRESPOND_MODEL")
                .unwrap_or_else(|_| DEFAULT_USER_CORRESPOND_MODEL.to_string()),
        };

        if config.conversion_workers == 0 {
            return Err(ConfigError::Invalid {
                name: "CONVERSION_WORKERS",
                value: "0".to_string(),
            });
        }

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn whisper_enabled(&self) -> bool {
        self.openai_api_key.is_some()
    }

    pub fn google_enabled(&self) -> bool {
        self.google_credentials_path.is_some()
    }
}

/// Non-empty value of an environment variable
fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = env::var(name).unwrap_or_else(|_| default.to_string());
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}
