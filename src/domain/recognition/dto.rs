use serde::{Deserialize, Serialize};

/// Parameters for POST /recognize, accepted as query string or JSON body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizeParams {
    /// Audio file relative to the sounds root, extension included
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Request for POST /recognize/whisper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperRequest {
    /// Audio file relative to the sounds root, without extension
    pub file_path: String,
    #[serde(default = "default_file_format")]
    pub file_format: String,
    /// Correction profile applied to the transcript
    pub model: String,
    /// Spoken language; anything but English is translated into English
    #[serde(default = "default_whisper_language")]
    pub language: String,
}

fn default_file_format() -> String {
    "wav".to_string()
}

fn default_whisper_language() -> String {
    "English".to_string()
}

/// Response for the recognition endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub text: String,
}

/// What the recognition provider made of an audio file
#[derive(Debug, Clone, PartialEq)]
pub enum Recognition {
    Recognized(String),
    /// Audio was processed but contained no recognizable speech
    NoMatch(String),
    /// Provider gave up on the request
    Canceled(String),
}

/// Chat completion used to post-process a transcript
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub temperature: f32,
    pub system_prompt: String,
    pub content: String,
}
