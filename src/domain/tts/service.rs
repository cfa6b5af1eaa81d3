use super::cache::{
    discard, is_populated, partial_path, read_spec, spec_path, write_spec, CacheEntry, CacheKey,
};
use super::dto::{OutputFormat, SynthesisRequest, SynthesisResponse};
use super::error::TtsServiceError;
use super::outcome::SynthesisOutcome;
use super::ssml::render_ssml;
use crate::infrastructure::audio::{AudioConverter, AudioSpec, ConversionJob};
use crate::infrastructure::repositories::TtsRepository;
use async_trait::async_trait;
use futures::StreamExt;
use moka::future::Cache;
use moka::ops::compute::Op;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, Semaphore};

pub struct TtsService {
    tts_repo: Arc<dyn TtsRepository>,
    converter: Arc<dyn AudioConverter>,
    sounds_dir: PathBuf,
    conversion_permits: Arc<Semaphore>,
    /// One lock per cache key so concurrent identical requests share a
    /// single provider call
    in_flight: Cache<CacheKey, Arc<Mutex<()>>>,
}

impl TtsService {
    pub fn new(
        tts_repo: Arc<dyn TtsRepository>,
        converter: Arc<dyn AudioConverter>,
        sounds_dir: PathBuf,
        conversion_workers: usize,
    ) -> Self {
        let in_flight = Cache::builder().build();

        Self {
            tts_repo,
            converter,
            sounds_dir,
            conversion_permits: Arc::new(Semaphore::new(conversion_workers.max(1))),
            in_flight,
        }
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Synthesize text into a cached audio artifact
    ///
    /// This operation:
    /// - Renders the SSML payload and derives its cache key
    /// - Stores the payload next to the artifacts for auditing
    /// - Fetches the canonical audio from the provider on a cache miss
    /// - Derives the requested output format on a cache miss
    ///
    /// Provider and conversion failures come back in `result`; only invalid
    /// input and filesystem failures are errors.
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsServiceError>;

    /// Provider voice catalog, unmodified
    async fn list_voices(&self) -> Result<serde_json::Value, TtsServiceError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsServiceError> {
        request.validate()?;

        let provider = self.tts_repo.provider();

        // 1. Render payload and derive the cache entry
        let payload = render_ssml(&request);
        tracing::debug!(payload = %payload, "Rendered synthesis payload");

        let key = CacheKey::from_payload(&payload);
        let entry = CacheEntry::new(&self.sounds_dir, provider, &request.voice, key.clone());

        // 2. Ensure directory and keep the payload for auditing
        tokio::fs::create_dir_all(entry.directory()).await?;
        tokio::fs::write(entry.payload_path(), &payload).await?;

        // 3. Serialize work on the same key
        let lock = self
            .in_flight
            .get_with(key.clone(), async { Arc::new(Mutex::new(())) })
            .await;

        // 4. Canonical artifact, then derived format
        let produced = {
            let _guard = lock.lock().await;
            self.produce(&entry, &payload, &request.output).await
        };
        self.release_lock(&key, lock).await;
        let result = produced?;

        tracing::info!(
            cache_key = %key,
            voice = %request.voice,
            exten = %request.output.extension,
            result = %result,
            "Synthesis request completed"
        );

        Ok(SynthesisResponse {
            sound_path: entry.sound_path(),
            exten: request.output.extension,
            result,
        })
    }

    async fn list_voices(&self) -> Result<serde_json::Value, TtsServiceError> {
        self.tts_repo
            .list_voices()
            .await
            .map_err(TtsServiceError::Dependency)
    }
}

impl TtsService {
    async fn produce(
        &self,
        entry: &CacheEntry,
        payload: &str,
        output: &OutputFormat,
    ) -> Result<SynthesisOutcome, TtsServiceError> {
        if self.ensure_canonical(entry, payload).await? {
            self.derive_format(entry, output).await
        } else {
            Ok(SynthesisOutcome::ProviderError(self.tts_repo.provider().to_string()))
        }
    }

    /// Forget the key's lock once no other request holds or awaits it.
    /// The map entry handed to the closure is itself a clone, hence two.
    async fn release_lock(&self, key: &CacheKey, lock: Arc<Mutex<()>>) {
        drop(lock);
        self.in_flight
            .entry(key.clone())
            .and_compute_with(|current| {
                let op = match current {
                    Some(current) if Arc::strong_count(current.value()) <= 2 => Op::Remove,
                    _ => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;
    }

    /// Make sure the canonical artifact exists. Returns false when the
    /// provider could not deliver a non-empty body.
    async fn ensure_canonical(&self, entry: &CacheEntry, payload: &str) -> Result<bool, TtsServiceError> {
        let canonical = entry.canonical_path();

        if is_populated(&canonical).await {
            tracing::info!(cache_key = %entry.key(), "Canonical audio cache hit");
            return Ok(true);
        }

        tracing::info!(cache_key = %entry.key(), "Canonical audio cache miss, calling provider");

        let mut stream = match self.tts_repo.synthesize(payload).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!(cache_key = %entry.key(), error = %e, "Provider synthesis failed");
                return Ok(false);
            }
        };

        let partial = partial_path(&canonical);
        let mut file = tokio::fs::File::create(&partial).await?;
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(bytes) => {
                    file.write_all(&bytes).await?;
                    written += bytes.len() as u64;
                }
                Err(e) => {
                    tracing::error!(
                        cache_key = %entry.key(),
                        bytes_written = written,
                        error = %e,
                        "Provider audio stream failed"
                    );
                    drop(file);
                    discard(&partial).await;
                    return Ok(false);
                }
            }
        }

        file.flush().await?;
        drop(file);

        if written == 0 {
            tracing::error!(cache_key = %entry.key(), "Provider returned an empty audio body");
            discard(&partial).await;
            return Ok(false);
        }

        tokio::fs::rename(&partial, &canonical).await?;

        tracing::info!(
            cache_key = %entry.key(),
            audio_size_bytes = written,
            "Canonical audio stored"
        );

        Ok(true)
    }

    /// Produce the derived artifact from the canonical one on the bounded
    /// conversion pool.
    async fn derive_format(
        &self,
        entry: &CacheEntry,
        output: &OutputFormat,
    ) -> Result<SynthesisOutcome, TtsServiceError> {
        let derived = entry.artifact(&output.extension);

        if is_populated(&derived).await && read_spec(&derived).await.as_ref() == Some(&output.spec) {
            tracing::info!(cache_key = %entry.key(), exten = %output.extension, "Derived audio cache hit");
            return Ok(SynthesisOutcome::Cached);
        }

        // The artifact on disk, if any, was produced for another format
        discard(&spec_path(&derived)).await;

        let partial = partial_path(&derived);
        let job = ConversionJob {
            input: entry.canonical_path(),
            input_spec: AudioSpec::canonical(),
            output: partial.clone(),
            output_spec: output.spec.clone(),
        };

        let permit = self
            .conversion_permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| TtsServiceError::Dependency(format!("conversion pool closed: {}", e)))?;
        let converter = self.converter.clone();
        let start_time = std::time::Instant::now();

        let joined = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            converter.convert(&job)
        })
        .await;

        let converted = match joined {
            Ok(Ok(())) => {
                let populated = is_populated(&partial).await;
                if !populated {
                    tracing::error!(cache_key = %entry.key(), exten = %output.extension, "Converter produced no audio");
                }
                populated
            }
            Ok(Err(e)) => {
                tracing::error!(cache_key = %entry.key(), exten = %output.extension, error = %e, "Audio conversion failed");
                false
            }
            Err(e) => {
                tracing::error!(cache_key = %entry.key(), error = %e, "Audio conversion task aborted");
                false
            }
        };

        if !converted {
            discard(&partial).await;
            return Ok(SynthesisOutcome::ConversionError);
        }

        tokio::fs::rename(&partial, &derived).await?;
        write_spec(&derived, &output.spec).await?;

        tracing::info!(
            cache_key = %entry.key(),
            exten = %output.extension,
            latency_ms = start_time.elapsed().as_millis(),
            "Derived audio stored"
        );

        Ok(SynthesisOutcome::Success)
    }
}
