use super::correction::{translation_prompt, CorrectionProfiles};
use super::dto::{Recognition, RecognizeParams, TranscriptResponse, WhisperRequest};
use super::error::RecognitionServiceError;
use crate::domain::shared::resolve_sound_path;
use crate::infrastructure::repositories::{SpeechRepository, TranscriptionRepository};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Short-audio recognition of files under the sounds root
pub struct RecognitionService {
    speech_repo: Arc<dyn SpeechRepository>,
    sounds_dir: PathBuf,
    default_language: String,
}

impl RecognitionService {
    pub fn new(speech_repo: Arc<dyn SpeechRepository>, sounds_dir: PathBuf, default_language: String) -> Self {
        Self {
            speech_repo,
            sounds_dir,
            default_language,
        }
    }

    /// Recognize the utterance in an audio file.
    ///
    /// Returns None when the provider heard no speech or cancelled; those
    /// are logged, not raised.
    pub async fn recognize(
        &self,
        params: RecognizeParams,
    ) -> Result<Option<TranscriptResponse>, RecognitionServiceError> {
        let audio_path = resolve(&self.sounds_dir, &params.file_path)?;
        let language = params.language.unwrap_or_else(|| self.default_language.clone());

        tracing::debug!(
            audio = %audio_path.display(),
            language = %language,
            "Executing recognition"
        );

        let audio = read_audio(&audio_path).await?;
        let content_type = content_type_for(&audio_path);

        let recognition = self
            .speech_repo
            .recognize(audio, content_type, &language)
            .await
            .map_err(RecognitionServiceError::Dependency)?;

        match recognition {
            Recognition::Recognized(text) => {
                let text = clean_transcript(&text);
                tracing::debug!(file_path = %params.file_path, result = %text, "Recognition completed");
                Ok(Some(TranscriptResponse { text }))
            }
            Recognition::NoMatch(details) => {
                tracing::error!(file_path = %params.file_path, details = %details, "No speech could be recognized");
                Ok(None)
            }
            Recognition::Canceled(details) => {
                tracing::error!(file_path = %params.file_path, details = %details, "Speech recognition canceled");
                Ok(None)
            }
        }
    }
}

/// Whisper transcription with optional fine-tuned correction
pub struct WhisperService {
    transcription_repo: Arc<dyn TranscriptionRepository>,
    sounds_dir: PathBuf,
    profiles: CorrectionProfiles,
}

impl WhisperService {
    pub fn new(
        transcription_repo: Arc<dyn TranscriptionRepository>,
        sounds_dir: PathBuf,
        profiles: CorrectionProfiles,
    ) -> Self {
        Self {
            transcription_repo,
            sounds_dir,
            profiles,
        }
    }

    pub async fn recognize(&self, request: WhisperRequest) -> Result<TranscriptResponse, RecognitionServiceError> {
        let relative = format!("{}.{}", request.file_path, request.file_format);
        let audio_path = resolve(&self.sounds_dir, &relative)?;

        if !tokio::fs::try_exists(&audio_path).await? {
            return Err(RecognitionServiceError::NotFound(relative));
        }

        tracing::debug!(
            audio = %audio_path.display(),
            model = %request.model,
            language = %request.language,
            "Executing whisper recognition"
        );

        let transcript = if request.language.eq_ignore_ascii_case("english") {
            self.transcription_repo.transcribe(&audio_path).await
        } else {
            self.transcription_repo
                .translate(&audio_path, &translation_prompt(&request.language))
                .await
        }
        .map_err(RecognitionServiceError::Dependency)?;

        tracing::debug!(transcript = %transcript, "Speech recognition result");

        if transcript.trim().is_empty() {
            return Ok(TranscriptResponse { text: transcript });
        }

        let today = chrono::Local::now().date_naive();
        let Some(completion) = self.profiles.request_for(&request.model, &transcript, today) else {
            return Ok(TranscriptResponse { text: transcript });
        };

        let corrected = self
            .transcription_repo
            .complete(completion)
            .await
            .map_err(RecognitionServiceError::Dependency)?;

        tracing::debug!(result = %corrected, "Transcript correction result");

        Ok(TranscriptResponse { text: corrected })
    }
}

fn resolve(root: &Path, relative: &str) -> Result<PathBuf, RecognitionServiceError> {
    resolve_sound_path(root, relative)
        .ok_or_else(|| RecognitionServiceError::Invalid(format!("Invalid file path: {:?}", relative)))
}

async fn read_audio(path: &Path) -> Result<Vec<u8>, RecognitionServiceError> {
    match tokio::fs::read(path).await {
        Ok(audio) => Ok(audio),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(RecognitionServiceError::NotFound(path.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ogg") | Some("opus") => "audio/ogg; codecs=opus",
        _ => "audio/wav; codecs=audio/pcm; samplerate=16000",
    }
}

/// Strip the surrounding spaces and periods the recognizer adds
fn clean_transcript(text: &str) -> String {
    text.trim_matches(|c| c == ' ' || c == '.').to_string()
}
