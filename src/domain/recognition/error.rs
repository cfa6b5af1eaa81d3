use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum RecognitionServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("audio not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl From<RecognitionServiceError> for AppError {
    fn from(err: RecognitionServiceError) -> Self {
        match err {
            RecognitionServiceError::Invalid(msg) => AppError::BadRequest(msg),
            RecognitionServiceError::NotFound(msg) => AppError::NotFound(msg),
            RecognitionServiceError::Dependency(msg) => AppError::ExternalService(msg),
            RecognitionServiceError::Storage(e) => AppError::Internal(e.to_string()),
        }
    }
}
