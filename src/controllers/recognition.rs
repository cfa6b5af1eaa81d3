use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use std::sync::Arc;

use super::body_or_query;
use crate::{
    domain::recognition::{
        RecognitionService, RecognizeParams, TranscriptResponse, WhisperRequest, WhisperService,
    },
    error::AppResult,
};

pub struct RecognitionController {
    recognition_service: Arc<RecognitionService>,
}

impl RecognitionController {
    pub fn new(recognition_service: Arc<RecognitionService>) -> Self {
        Self { recognition_service }
    }

    /// POST /recognize - Recognize a short utterance; `null` when nothing was heard
    pub async fn recognize(
        State(controller): State<Arc<RecognitionController>>,
        query: Result<Query<RecognizeParams>, QueryRejection>,
        body: Result<Json<RecognizeParams>, JsonRejection>,
    ) -> AppResult<Json<Option<TranscriptResponse>>> {
        let params = body_or_query(query, body)?;

        let response = controller.recognition_service.recognize(params).await?;
        Ok(Json(response))
    }
}

pub struct WhisperController {
    whisper_service: Arc<WhisperService>,
}

impl WhisperController {
    pub fn new(whisper_service: Arc<WhisperService>) -> Self {
        Self { whisper_service }
    }

    /// POST /recognize/whisper - Transcribe (or translate) and correct
    pub async fn recognize(
        State(controller): State<Arc<WhisperController>>,
        Json(request): Json<WhisperRequest>,
    ) -> AppResult<Json<TranscriptResponse>> {
        let response = controller.whisper_service.recognize(request).await?;
        Ok(Json(response))
    }
}
