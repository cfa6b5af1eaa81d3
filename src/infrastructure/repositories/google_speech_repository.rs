use super::speech_repository::SpeechRepository;
use crate::domain::recognition::Recognition;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;
use tokio::sync::Mutex;

const SPEECH_BASE_URL: &str = "https://speech.googleapis.com";
const RECOGNIZE_PATH: &str = "/v1/speech:recognize";
const SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens this close to expiry are refreshed before use
const REFRESH_MARGIN_SECS: i64 = 60;

/// Fields of a Google service-account key file used for token exchange
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub async fn load(path: &Path) -> Result<Self, String> {
        let raw = tokio::fs::read(path)
            .await
            .map_err(|e| format!("Failed to read Google credentials {}: {}", path.display(), e))?;
        serde_json::from_slice(&raw)
            .map_err(|e| format!("Invalid Google credentials {}: {}", path.display(), e))
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct AccessToken {
    value: String,
    expires_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<SpeechResult>,
}

#[derive(Debug, Default, Deserialize)]
struct SpeechResult {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Default, Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: String,
}

/// Google Cloud Speech-to-Text v1 recognition, authenticated with a service account
pub struct GoogleSpeechRepository {
    http_client: reqwest::Client,
    endpoint: String,
    credentials: ServiceAccountKey,
    signing_key: EncodingKey,
    token: Mutex<Option<AccessToken>>,
}

impl GoogleSpeechRepository {
    pub fn new(credentials: ServiceAccountKey) -> Result<Self, String> {
        Self::with_base_url(SPEECH_BASE_URL.to_string(), credentials)
    }

    pub fn with_base_url(base_url: String, credentials: ServiceAccountKey) -> Result<Self, String> {
        let signing_key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())
            .map_err(|e| format!("Invalid service account private key: {}", e))?;

        Ok(Self {
            http_client: reqwest::Client::new(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), RECOGNIZE_PATH),
            credentials,
            signing_key,
            token: Mutex::new(None),
        })
    }

    /// Bearer token for the speech API, exchanged from a signed assertion
    /// and reused until shortly before it expires
    async fn access_token(&self) -> Result<String, String> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() + Duration::seconds(REFRESH_MARGIN_SECS) {
                return Ok(token.value.clone());
            }
        }

        let now = Utc::now();
        let claims = AssertionClaims {
            iss: &self.credentials.client_email,
            scope: SCOPE,
            aud: &self.credentials.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(|e| format!("Failed to sign Google assertion: {}", e))?;

        tracing::debug!(token_uri = %self.credentials.token_uri, "Requesting Google access token");

        let response = self
            .http_client
            .post(&self.credentials.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| format!("Google token request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(format!("Google token exchange failed with {}: {}", status, error_text));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse Google token response: {}", e))?;

        let value = token.access_token.clone();
        *cached = Some(AccessToken {
            value: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        });

        Ok(value)
    }

    /// WAV and FLAC carry their own header; Opus needs it spelled out
    fn recognition_config(content_type: &str, language: &str) -> Value {
        if content_type.starts_with("audio/ogg") {
            json!({
                "encoding": "OGG_OPUS",
                "sampleRateHertz": 16000,
                "languageCode": language,
            })
        } else {
            json!({ "languageCode": language })
        }
    }

    fn interpret(body: RecognizeResponse) -> Recognition {
        let transcript = body
            .results
            .iter()
            .filter_map(|result| result.alternatives.first())
            .map(|alternative| alternative.transcript.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if transcript.is_empty() {
            Recognition::NoMatch("no results".to_string())
        } else {
            Recognition::Recognized(transcript)
        }
    }
}

#[async_trait]
impl SpeechRepository for GoogleSpeechRepository {
    async fn recognize(&self, audio: Vec<u8>, content_type: &str, language: &str) -> Result<Recognition, String> {
        tracing::debug!(
            language = language,
            content_type = content_type,
            audio_size_bytes = audio.len(),
            "Calling Google speech recognition"
        );

        let token = self.access_token().await?;
        let body = json!({
            "config": Self::recognition_config(content_type, language),
            "audio": { "content": STANDARD.encode(&audio) },
        });

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Google recognition request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(format!("Google recognition failed with {}: {}", status, error_text));
        }

        let body = response
            .json::<RecognizeResponse>()
            .await
            .map_err(|e| format!("Failed to parse Google recognition result: {}", e))?;

        Ok(Self::interpret(body))
    }
}
