use super::cache::RESERVED_EXTENSIONS;
use super::error::TtsServiceError;
use super::outcome::SynthesisOutcome;
use crate::infrastructure::audio::AudioSpec;
use serde::{Deserialize, Serialize};

const DEFAULT_EXTENSION: &str = "alaw";
const DEFAULT_FILE_TYPE: &str = "al";
const DEFAULT_RATE: u32 = 8000;
const DEFAULT_BITS: u8 = 16;
const DEFAULT_CHANNELS: u8 = 1;

/// Parameters for POST /synthesize, accepted as query string or JSON body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynthesizeParams {
    #[serde(default)]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(alias = "extension", skip_serializing_if = "Option::is_none")]
    pub exten: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    /// Output sample rate in Hz
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bits: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u8>,
    /// Speaking rate, provider syntax (e.g. "+10%", "slow")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prosody_rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<String>,
    /// URI of a pronunciation lexicon
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexicon: Option<String>,
}

impl SynthesizeParams {
    pub fn into_request(self, default_voice: &str) -> SynthesisRequest {
        let file_type = self.file_type.unwrap_or_else(|| DEFAULT_FILE_TYPE.to_string());
        SynthesisRequest {
            text: self.text,
            voice: self.voice.unwrap_or_else(|| default_voice.to_string()),
            prosody: Prosody {
                rate: self.prosody_rate,
                pitch: self.pitch,
            },
            lexicon: self.lexicon,
            output: OutputFormat {
                extension: self.exten.unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
                spec: AudioSpec {
                    file_type,
                    encoding: None,
                    rate: self.rate.unwrap_or(DEFAULT_RATE),
                    bits: self.bits.unwrap_or(DEFAULT_BITS),
                    channels: self.channels.unwrap_or(DEFAULT_CHANNELS),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prosody {
    pub rate: Option<String>,
    pub pitch: Option<String>,
}

impl Prosody {
    pub fn is_empty(&self) -> bool {
        self.rate.is_none() && self.pitch.is_none()
    }
}

/// Requested derived artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFormat {
    /// File extension of the derived artifact, echoed back to the caller
    pub extension: String,
    pub spec: AudioSpec,
}

#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    /// Provider voice id; its first five characters are the locale
    pub voice: String,
    pub prosody: Prosody,
    pub lexicon: Option<String>,
    pub output: OutputFormat,
}

impl SynthesisRequest {
    /// Locale prefix of the voice id, e.g. "es-MX" for "es-MX-JorgeNeural"
    pub fn language(&self) -> &str {
        self.voice.get(..5).unwrap_or(&self.voice)
    }

    /// Voice and extension end up as path segments of the cache, so they
    /// are restricted to a safe alphabet.
    pub fn validate(&self) -> Result<(), TtsServiceError> {
        if self.text.is_empty() {
            return Err(TtsServiceError::Invalid("text is required".to_string()));
        }
        if !is_path_safe(&self.voice) {
            return Err(TtsServiceError::Invalid(format!(
                "Invalid voice identifier: {:?}",
                self.voice
            )));
        }
        let extension = &self.output.extension;
        if !is_path_safe(extension) || RESERVED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(TtsServiceError::Invalid(format!(
                "Invalid output extension: {:?}",
                extension
            )));
        }
        if !is_path_safe(&self.output.spec.file_type) {
            return Err(TtsServiceError::Invalid(format!(
                "Invalid file type: {:?}",
                self.output.spec.file_type
            )));
        }
        if self.output.spec.rate == 0 || self.output.spec.bits == 0 || self.output.spec.channels == 0 {
            return Err(TtsServiceError::Invalid(
                "Rate, bits and channels must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn is_path_safe(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Response for POST /synthesize
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisResponse {
    /// Cache-relative path of the artifacts, without extension
    pub sound_path: String,
    pub exten: String,
    pub result: SynthesisOutcome,
}
