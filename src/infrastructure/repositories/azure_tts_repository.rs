use super::tts_repository::{AudioStream, TtsRepository};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;

pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";
/// Highest quality raw layout; every other format is derived from it locally
const OUTPUT_FORMAT: &str = "raw-24khz-16bit-mono-pcm";

/// Azure Cognitive Services implementation of TTS repository
pub struct AzureTtsRepository {
    http_client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl AzureTtsRepository {
    pub fn new(base_url: String, api_token: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }
}

#[async_trait]
impl TtsRepository for AzureTtsRepository {
    fn provider(&self) -> &'static str {
        "azure"
    }

    async fn synthesize(&self, payload: &str) -> Result<AudioStream, String> {
        tracing::info!(
            provider = "azure",
            output_format = OUTPUT_FORMAT,
            payload_length = payload.len(),
            "Calling Azure speech synthesis"
        );

        let response = self
            .http_client
            .post(format!("{}/v1", self.base_url))
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_token)
            .header(OUTPUT_FORMAT_HEADER, OUTPUT_FORMAT)
            .header(CONTENT_TYPE, "application/ssml+xml")
            .header("User-Agent", "speech-gateway")
            .body(payload.to_string())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Azure speech synthesis request failed");
                format!("Azure synthesis request failed: {}", e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                status = %status,
                body = %error_text,
                "Azure speech synthesis rejected the request"
            );
            return Err(format!("Azure synthesis failed with {}: {}", status, error_text));
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| format!("Azure audio stream interrupted: {}", e)))
            .boxed())
    }

    async fn list_voices(&self) -> Result<serde_json::Value, String> {
        let response = self
            .http_client
            .get(format!("{}/voices/list", self.base_url))
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_token)
            .send()
            .await
            .map_err(|e| format!("Azure voice list request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("Azure voice list failed with {}", response.status()));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| format!("Failed to parse Azure voice list: {}", e))
    }
}
