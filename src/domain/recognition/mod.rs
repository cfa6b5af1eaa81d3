pub mod correction;
pub mod dto;
pub mod error;
pub mod service;

pub use correction::CorrectionProfiles;
pub use dto::{CompletionRequest, Recognition, RecognizeParams, TranscriptResponse, WhisperRequest};
pub use error::RecognitionServiceError;
pub use service::{RecognitionService, WhisperService};
