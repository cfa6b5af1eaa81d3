use crate::domain::recognition::{CompletionRequest, Recognition};
use async_trait::async_trait;
use std::path::Path;

/// Repository for short-audio speech recognition
#[async_trait]
pub trait SpeechRepository: Send + Sync {
    /// Recognize a single utterance
    ///
    /// # Arguments
    /// * `audio` - Complete audio file contents
    /// * `content_type` - MIME type describing the audio container/codec
    /// * `language` - BCP-47 locale of the speech, e.g. "es-MX"
    async fn recognize(&self, audio: Vec<u8>, content_type: &str, language: &str) -> Result<Recognition, String>;
}

/// Repository for whisper transcription and transcript post-processing
#[async_trait]
pub trait TranscriptionRepository: Send + Sync {
    /// Transcribe audio in its spoken language
    async fn transcribe(&self, audio: &Path) -> Result<String, String>;

    /// Transcribe audio and translate it into English
    async fn translate(&self, audio: &Path, prompt: &str) -> Result<String, String>;

    /// Run a chat completion, returning the first choice's content
    async fn complete(&self, request: CompletionRequest) -> Result<String, String>;
}
