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
    domain::tts::{SynthesisResponse, SynthesizeParams, TtsService, TtsServiceApi},
    error::AppResult,
};

pub struct TtsController {
    tts_service: Arc<TtsService>,
    default_voice: String,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>, default_voice: String) -> Self {
        Self {
            tts_service,
            default_voice,
        }
    }

    /// POST /synthesize - Synthesize text into a cached audio artifact
    ///
    /// Parameters come from a JSON body, or from the query string when no
    /// JSON body is sent.
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        query: Result<Query<SynthesizeParams>, QueryRejection>,
        body: Result<Json<SynthesizeParams>, JsonRejection>,
    ) -> AppResult<Json<SynthesisResponse>> {
        let params = body_or_query(query, body)?;

        let request = params.into_request(&controller.default_voice);
        let response = controller.tts_service.synthesize(request).await?;

        Ok(Json(response))
    }

    /// GET /voicelist - Provider voice catalog, passed through verbatim
    pub async fn voice_list(
        State(controller): State<Arc<TtsController>>,
    ) -> AppResult<Json<serde_json::Value>> {
        let voices = controller.tts_service.list_voices().await?;
        Ok(Json(voices))
    }
}
