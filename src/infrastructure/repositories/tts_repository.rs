use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

/// Audio body as it arrives from the provider, chunk by chunk
pub type AudioStream = BoxStream<'static, Result<Bytes, String>>;

/// Repository for speech synthesis operations.
/// Abstracts the remote provider performing the actual synthesis.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Short provider name, used as the top-level cache directory and in
    /// the `{provider}_error` result marker
    fn provider(&self) -> &'static str;

    /// Submit a fully rendered synthesis payload.
    ///
    /// Returns the response body as a stream so callers can write it to
    /// disk without buffering the whole audio in memory. The stream yields
    /// the canonical 24 kHz, 16-bit, mono signed PCM layout.
    ///
    /// # Errors
    /// Returns error if the provider is unreachable or answers non-2xx
    async fn synthesize(&self, payload: &str) -> Result<AudioStream, String>;

    /// Fetch the provider's voice catalog as-is
    async fn list_voices(&self) -> Result<serde_json::Value, String>;
}
