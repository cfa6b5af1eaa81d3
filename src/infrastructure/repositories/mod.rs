pub mod azure_speech_repository;
pub mod azure_tts_repository;
pub mod google_speech_repository;
pub mod openai_transcription_repository;
pub mod speech_repository;
pub mod tts_repository;

pub use azure_speech_repository::AzureSpeechRepository;
pub use azure_tts_repository::AzureTtsRepository;
pub use google_speech_repository::{GoogleSpeechRepository, ServiceAccountKey};
pub use openai_transcription_repository::OpenAiTranscriptionRepository;
pub use speech_repository::{SpeechRepository, TranscriptionRepository};
pub use tts_repository::{AudioStream, TtsRepository};
