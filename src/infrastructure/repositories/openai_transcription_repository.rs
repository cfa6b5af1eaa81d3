use super::speech_repository::TranscriptionRepository;
use crate::domain::recognition::CompletionRequest;
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, CreateTranscriptionRequestArgs, CreateTranslationRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

const WHISPER_MODEL: &str = "whisper-1";

/// OpenAI whisper + chat completion implementation of transcription repository
pub struct OpenAiTranscriptionRepository {
    client: Arc<Client<OpenAIConfig>>,
}

impl OpenAiTranscriptionRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TranscriptionRepository for OpenAiTranscriptionRepository {
    async fn transcribe(&self, audio: &Path) -> Result<String, String> {
        let start_time = std::time::Instant::now();

        let request = CreateTranscriptionRequestArgs::default()
            .file(audio)
            .model(WHISPER_MODEL)
            .build()
            .map_err(|e| format!("Invalid transcription request: {}", e))?;

        let response = self.client.audio().transcribe(request).await.map_err(|e| {
            tracing::error!(error = %e, audio = %audio.display(), "OpenAI transcription failed");
            format!("OpenAI transcription error: {}", e)
        })?;

        tracing::info!(
            provider = "openai",
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = response.text.len(),
            "Whisper transcription completed"
        );

        Ok(response.text)
    }

    async fn translate(&self, audio: &Path, prompt: &str) -> Result<String, String> {
        let start_time = std::time::Instant::now();

        let request = CreateTranslationRequestArgs::default()
            .file(audio)
            .model(WHISPER_MODEL)
            .prompt(prompt)
            .build()
            .map_err(|e| format!("Invalid translation request: {}", e))?;

        let response = self.client.audio().translate(request).await.map_err(|e| {
            tracing::error!(error = %e, audio = %audio.display(), "OpenAI translation failed");
            format!("OpenAI translation error: {}", e)
        })?;

        tracing::info!(
            provider = "openai",
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = response.text.len(),
            "Whisper translation completed"
        );

        Ok(response.text)
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system_prompt)
                .build()
                .map_err(|e| format!("Invalid system message: {}", e))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.content)
                .build()
                .map_err(|e| format!("Invalid user message: {}", e))?
                .into(),
        ];

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(request.model.clone())
            .temperature(request.temperature)
            .messages(messages)
            .build()
            .map_err(|e| format!("Invalid completion request: {}", e))?;

        let response = self.client.chat().create(chat_request).await.map_err(|e| {
            tracing::error!(error = %e, model = %request.model, "OpenAI chat completion failed");
            format!("OpenAI completion error: {}", e)
        })?;

        tracing::debug!(model = %request.model, response = ?response, "Transcript correction response");

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| "OpenAI completion returned no content".to_string())
    }
}
