use super::azure_tts_repository::SUBSCRIPTION_KEY_HEADER;
use super::speech_repository::SpeechRepository;
use crate::domain::recognition::Recognition;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;

const RECOGNITION_PATH: &str = "/speech/recognition/conversation/cognitiveservices/v1";

/// Body of the short-audio recognition endpoint (simple format)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RecognitionBody {
    recognition_status: String,
    #[serde(default)]
    display_text: Option<String>,
}

/// Azure Cognitive Services short-audio recognition
pub struct AzureSpeechRepository {
    http_client: reqwest::Client,
    endpoint: String,
    api_token: String,
}

impl AzureSpeechRepository {
    pub fn new(region: &str, api_token: String) -> Self {
        Self::with_base_url(format!("https://{}.stt.speech.microsoft.com", region), api_token)
    }

    pub fn with_base_url(base_url: String, api_token: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), RECOGNITION_PATH),
            api_token,
        }
    }

    fn interpret(body: RecognitionBody) -> Recognition {
        match body.recognition_status.as_str() {
            "Success" => Recognition::Recognized(body.display_text.unwrap_or_default()),
            "NoMatch" | "InitialSilenceTimeout" | "BabbleTimeout" => {
                Recognition::NoMatch(body.recognition_status)
            }
            _ => Recognition::Canceled(body.recognition_status),
        }
    }
}

#[async_trait]
impl SpeechRepository for AzureSpeechRepository {
    async fn recognize(&self, audio: Vec<u8>, content_type: &str, language: &str) -> Result<Recognition, String> {
        tracing::debug!(
            language = language,
            content_type = content_type,
            audio_size_bytes = audio.len(),
            "Calling Azure speech recognition"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .query(&[("language", language), ("format", "simple")])
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_token)
            .header(CONTENT_TYPE, content_type)
            .header(ACCEPT, "application/json")
            .body(audio)
            .send()
            .await
            .map_err(|e| format!("Azure recognition request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(format!("Azure recognition failed with {}: {}", status, error_text));
        }

        let body = response
            .json::<RecognitionBody>()
            .await
            .map_err(|e| format!("Failed to parse Azure recognition result: {}", e))?;

        Ok(Self::interpret(body))
    }
}
