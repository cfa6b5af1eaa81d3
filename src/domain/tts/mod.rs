pub mod cache;
pub mod dto;
pub mod error;
pub mod outcome;
pub mod service;
pub mod ssml;

pub use cache::{CacheEntry, CacheKey};
pub use dto::{OutputFormat, Prosody, SynthesisRequest, SynthesisResponse, SynthesizeParams};
pub use error::TtsServiceError;
pub use outcome::SynthesisOutcome;
pub use service::{TtsService, TtsServiceApi};
pub use ssml::render_ssml;
